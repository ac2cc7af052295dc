pub mod notifier;
pub mod subject;
