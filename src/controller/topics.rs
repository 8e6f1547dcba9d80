//! # Event Topics
//!
//! Subscriber lists for push-mode delivery.
//!
//! | Topic | Name | Delivered |
//! |-------|------|-----------|
//! | [`Topic::Data`] | `data` | After every processed report |
//! | [`Topic::ButtonPressed`] | `buttonPressed` | Reserved |
//! | [`Topic::AxisMoved`] | `axisMoved` | Reserved |

use std::fmt;
use std::str::FromStr;

use crate::error::JoystickError;
use crate::report::ControlSnapshot;

/// Callback invoked with each delivered snapshot.
pub type Subscriber = Box<dyn FnMut(&ControlSnapshot) + Send>;

/// Known event topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// New snapshot from a pushed report
    Data,
    /// Reserved, never delivered
    ButtonPressed,
    /// Reserved, never delivered
    AxisMoved,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Data, Topic::ButtonPressed, Topic::AxisMoved];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Topic::Data => "data",
            Topic::ButtonPressed => "buttonPressed",
            Topic::AxisMoved => "axisMoved",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Topic {
    type Err = JoystickError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.name() == name)
            .ok_or_else(|| JoystickError::UnsupportedTopic(name.to_string()))
    }
}

/// Ordered subscriber lists, one per topic.
#[derive(Default)]
pub struct Subscribers {
    data: Vec<Subscriber>,
    button_pressed: Vec<Subscriber>,
    axis_moved: Vec<Subscriber>,
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("data", &self.data.len())
            .field("button_pressed", &self.button_pressed.len())
            .field("axis_moved", &self.axis_moved.len())
            .finish()
    }
}

impl Subscribers {
    fn list_mut(&mut self, topic: Topic) -> &mut Vec<Subscriber> {
        match topic {
            Topic::Data => &mut self.data,
            Topic::ButtonPressed => &mut self.button_pressed,
            Topic::AxisMoved => &mut self.axis_moved,
        }
    }

    /// Appends a subscriber to the topic's list.
    pub fn add(&mut self, topic: Topic, subscriber: Subscriber) {
        self.list_mut(topic).push(subscriber);
    }

    #[must_use]
    pub fn count(&self, topic: Topic) -> usize {
        match topic {
            Topic::Data => self.data.len(),
            Topic::ButtonPressed => self.button_pressed.len(),
            Topic::AxisMoved => self.axis_moved.len(),
        }
    }

    /// Calls every subscriber of `topic` in subscription order.
    pub fn emit(&mut self, topic: Topic, snapshot: &ControlSnapshot) {
        for subscriber in self.list_mut(topic).iter_mut() {
            subscriber(snapshot);
        }
    }
}
