pub mod limits {

    /// How many translators/reviewers a video page shows at most.
    pub const CONTRIBUTOR_DISPLAY: usize = 4;
}

pub mod resolution {

    /// A unique-constraint conflict during OAuth resolution is retried this
    /// many times from a fresh read before giving up.
    pub const CONFLICT_RETRIES: u32 = 1;
}
