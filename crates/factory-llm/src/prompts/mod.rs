// ABOUTME: Prompt building blocks: system personas, environment context, and task templates.
// ABOUTME: Everything here is a pure function of its inputs apart from the current date and platform.

pub mod system;
pub mod tasks;
