use crate::types::Video;

pub const EMPTY_LIST_CAPTION: &str = "No videos generated yet";

/// Generated videos shown under the dashboard.
///
/// No endpoint lists finished videos, so `new` always starts empty.
#[derive(Debug, Clone, Default)]
pub struct VideoList {
    videos: Vec<Video>,
}

impl VideoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_videos(videos: Vec<Video>) -> Self {
        Self { videos }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let list = VideoList::new();
        assert!(list.is_empty());
        assert!(list.videos().is_empty());
    }
}
