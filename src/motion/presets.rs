//! Preset pose nodes for common reveal patterns.
//!
//! Sections build their trees from these instead of spelling out poses:
//!
//! - [`stagger_container`] - fades in and sequences its children
//! - [`fade_up`] - rises into place while fading in
//! - [`slide_in`] - slides horizontally into place
//! - [`alternating_timeline`] - entries sliding in from alternating sides
//! - [`skill_bar`] - a bar growing to its level in percent of its track
//! - [`hover_lift`] / [`hover_overlay`] - poses driven by pointer hover
//! - [`hero`] / [`about`] - the full trees used by the landing sections

use std::time::Duration;

use super::easing::Ease;
use super::pose::{Pose, PoseNode, Transition};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Container that fades in and staggers its children.
pub fn stagger_container(stagger: Duration, delay_children: Duration) -> PoseNode {
    PoseNode::new(Pose::new().opacity(0.0), Pose::new().opacity(1.0))
        .stagger_children(stagger)
        .delay_children(delay_children)
}

/// Item that rises `distance` pixels while fading in.
pub fn fade_up(distance: f32, duration: Duration) -> PoseNode {
    PoseNode::new(
        Pose::new().opacity(0.0).y(distance),
        Pose::new().opacity(1.0).y(0.0),
    )
    .with_transition(Transition::new(duration, Ease::EaseOut))
}

/// Item that slides in from `offset` pixels on the x axis.
pub fn slide_in(offset: f32, duration: Duration, delay: Duration) -> PoseNode {
    PoseNode::new(
        Pose::new().opacity(0.0).x(offset),
        Pose::new().opacity(1.0).x(0.0),
    )
    .with_transition(Transition::new(duration, Ease::EaseOut).with_delay(delay))
}

/// `count` entries alternating left/right, each delayed by `index * step`.
pub fn alternating_timeline(count: usize, distance: f32, step: Duration) -> PoseNode {
    PoseNode::group().children_from((0..count).map(|index| {
        let offset = if index % 2 == 0 { -distance } else { distance };
        slide_in(offset, ms(600), step * index as u32)
    }))
}

/// Progress bar filling to `level` percent, the `index`th in its list.
pub fn skill_bar(level: f32, index: usize) -> PoseNode {
    let delay = ms(300) + ms(100) * index as u32;
    PoseNode::new(Pose::new().width(0.0), Pose::new().width(level.clamp(0.0, 100.0)))
        .with_transition(Transition::new(ms(1000), Ease::EaseOut).with_delay(delay))
}

/// Card that rises `distance` pixels while hovered.
pub fn hover_lift(distance: f32) -> PoseNode {
    PoseNode::new(Pose::new().y(0.0), Pose::new().y(-distance))
        .with_transition(Transition::new(ms(200), Ease::EaseOut))
}

/// Overlay that fades in while its card is hovered.
pub fn hover_overlay() -> PoseNode {
    PoseNode::new(Pose::new().opacity(0.0), Pose::new().opacity(1.0))
        .with_transition(Transition::new(ms(300), Ease::EaseOut))
}

/// Landing hero: five items rising 20px, 0.2s apart after 0.3s.
pub fn hero() -> PoseNode {
    stagger_container(ms(200), ms(300)).children_from((0..5).map(|_| fade_up(20.0, ms(800))))
}

/// About section: title, intro, stats grid, and experience timeline.
pub fn about(stats: usize, experiences: usize) -> PoseNode {
    let item = || fade_up(50.0, ms(600));
    let stats_grid = stagger_container(ms(200), Duration::ZERO)
        .children_from((0..stats).map(|_| item()));
    let journey = item().child(alternating_timeline(experiences, 50.0, ms(200)));

    stagger_container(ms(200), Duration::ZERO)
        .child(item())
        .child(item())
        .child(stats_grid)
        .child(journey)
}
