use serde::Serialize;

/// Local like/save state of one displayed post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostInteractions {
    pub liked: bool,
    pub saved: bool,
    pub like_count: u64,
}

impl PostInteractions {
    pub fn new(like_count: u64) -> Self {
        Self {
            liked: false,
            saved: false,
            like_count,
        }
    }

    /// Flip the like flag and move the counter with it. Returns the new flag.
    pub fn toggle_like(&mut self) -> bool {
        if self.liked {
            self.like_count = self.like_count.saturating_sub(1);
        } else {
            self.like_count = self.like_count.saturating_add(1);
        }
        self.liked = !self.liked;
        self.liked
    }

    /// Flip the save flag. Returns the new flag.
    pub fn toggle_save(&mut self) -> bool {
        self.saved = !self.saved;
        self.saved
    }
}
