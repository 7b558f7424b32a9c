pub mod completion;
pub mod groq;
pub mod prompt;
pub mod summarizer;
