/// This is the prefix used in logs to identify a started service.
///
/// For example:
///
/// ```text
/// 2024-06-25T12:36:25.025312Z  INFO TRACKER SERVER: Started on: tcp://0.0.0.0:8081
/// 2024-06-25T12:36:25.025445Z  INFO PEER SERVER: Started on: tcp://0.0.0.0:8082
/// ```
pub const STARTED_ON: &str = "Started on";
