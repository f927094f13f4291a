use serde::{Deserialize, Serialize};

/// One media source attached to a timeline lane.
///
/// `offset` shifts the source's content relative to the timeline origin and
/// may be negative. `duration` and `bookmark` are measured on the
/// un-offset content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Identifier of the data feed (typically its absolute path).
    pub id: String,
    /// Display name shown in the lane header.
    pub name: String,
    pub offset: i64,
    pub duration: i64,
    /// Timing information could not be resolved; nothing is laid out.
    #[serde(default)]
    pub erroneous: bool,
    #[serde(default)]
    pub bookmark: Option<i64>,
    #[serde(default)]
    pub selected: bool,
}

impl Track {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration: i64, offset: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            offset,
            duration,
            erroneous: false,
            bookmark: None,
            selected: false,
        }
    }

    /// Replace the feed's identity and timing after it has been
    /// recalculated. Clears the erroneous flag.
    pub fn set_track_information(
        &mut self,
        name: impl Into<String>,
        id: impl Into<String>,
        duration: i64,
        offset: i64,
    ) {
        self.name = name.into();
        self.id = id.into();
        self.duration = duration;
        self.offset = offset;
        self.erroneous = false;
    }

    /// Timeline position where the content ends, saturating at the `i64`
    /// range.
    pub fn end(&self) -> i64 {
        self.offset.saturating_add(self.duration)
    }

    /// Bookmark a content-relative position. Positions outside
    /// `[0, duration]` are ignored; returns whether the bookmark was set.
    pub fn add_bookmark(&mut self, position: i64) -> bool {
        if (0..=self.duration).contains(&position) {
            self.bookmark = Some(position);
            true
        } else {
            false
        }
    }

    /// Bookmark a timeline position, taking the offset into account.
    pub fn add_temporal_bookmark(&mut self, position: i64) -> bool {
        self.add_bookmark(position.saturating_sub(self.offset))
    }

    pub fn clear_bookmark(&mut self) {
        self.bookmark = None;
    }

    /// Bookmark expressed on the timeline rather than the content.
    pub fn temporal_bookmark(&self) -> Option<i64> {
        self.bookmark.map(|b| b.saturating_add(self.offset))
    }
}
