pub mod config;
pub mod core_chat;
pub mod http_api;
pub mod logging;
pub mod metrics;
pub mod shutdown;

pub use core_chat::{ChangeEvent, ChatError, EntityId, MutationService};
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        assert_eq!(EntityId(1).to_string(), "1");
    }
}
