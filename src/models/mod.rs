pub mod coach;
pub mod outcome;
pub mod prompt;
pub mod response;

pub use coach::CoachRequest;
pub use outcome::UpstreamOutcome;
pub use prompt::RenderedPrompt;
pub use response::CoachResponse;
