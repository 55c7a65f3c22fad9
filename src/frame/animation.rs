use serde::{Deserialize, Serialize};

/// Pivot point of a frame in its own pixel space, (0, 0) being the top left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Playback data that travels with the layout. `anchors` is indexed by frame
/// index; frames past its end have no anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Animation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<Anchor>,
}

impl Animation {
    pub fn anchor(&self, index: usize) -> Option<Anchor> {
        self.anchors.get(index).copied()
    }

    /// Whether anchors were given but not exactly one per frame
    pub fn anchors_mismatch(&self, frame_count: usize) -> bool {
        !self.anchors.is_empty() && self.anchors.len() != frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_lookup() {
        let animation = Animation {
            fps: Some(12),
            anchors: vec![Anchor::new(16.0, 32.0), Anchor::new(8.0, 8.0)],
        };

        assert_eq!(animation.anchor(1), Some(Anchor::new(8.0, 8.0)));
        assert_eq!(animation.anchor(2), None);
        assert!(!animation.anchors_mismatch(2));
        assert!(animation.anchors_mismatch(3));
        assert!(!Animation::default().anchors_mismatch(3));
    }
}
