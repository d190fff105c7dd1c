use strum::Display;

/// Human-readable messages placed in the success envelope, one per outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UserMessage {
    #[strum(serialize = "User profile fetched successfully")]
    ProfileFetched,
    #[strum(serialize = "User profile updated successfully")]
    ProfileUpdated,
    #[strum(serialize = "Profile image uploaded successfully")]
    AvatarUploaded,
    #[strum(serialize = "Profile image removed successfully")]
    AvatarRemoved,
    #[strum(serialize = "User profile deleted successfully")]
    ProfileDeleted,
}
