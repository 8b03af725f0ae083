//! Environment capability consumed by running commands.
//!
//! A command body never talks to a transport directly; it receives a
//! [`Environment`] that can deliver output, address the invoking user, and
//! answer permission questions. [`LongReply`] is the bounded buffered sink
//! for multi-chunk replies: each appended chunk costs one boundary check
//! against the transport's message cap, and flushing splits the buffered
//! text into cap-sized sends. A sink is owned by one invocation; it is never
//! shared.

use async_trait::async_trait;

use crate::command::Permission;
use crate::error::CommandError;

/// Result type for command bodies and output delivery.
pub type CommandResult = Result<(), CommandError>;

/// Default transport message cap in characters.
pub const DEFAULT_MESSAGE_CAP: usize = 2000;

/// Capabilities the dispatch layer grants to a command body.
#[async_trait]
pub trait Environment: Send {
    /// Deliver one message to the channel the command came from.
    async fn output(&mut self, text: &str) -> CommandResult;

    /// Whether the invoking user satisfies `level`.
    async fn check_permission(&self, level: Permission) -> bool;

    /// Addressing prefix prepended to replies (empty in direct channels).
    fn reply_prefix(&self) -> String {
        String::new()
    }

    /// Maximum size of one outbound message, in characters.
    fn message_cap(&self) -> usize {
        DEFAULT_MESSAGE_CAP
    }

    /// Deliver a message addressed to the invoking user.
    async fn reply(&mut self, text: &str) -> CommandResult {
        let prefix = self.reply_prefix();
        if prefix.is_empty() {
            self.output(text).await
        } else {
            self.output(&format!("{prefix}{text}")).await
        }
    }

    /// A buffered sink for unaddressed long output.
    fn output_long(&self) -> LongReply {
        LongReply::new(self.message_cap())
    }

    /// A buffered sink whose first chunk is the addressing prefix.
    fn reply_long(&self) -> LongReply {
        let mut sink = LongReply::new(self.message_cap());
        let prefix = self.reply_prefix();
        if !prefix.is_empty() {
            sink.push(prefix);
        }
        sink
    }
}

/// Bounded buffered reply sink.
#[derive(Debug)]
pub struct LongReply {
    cap: usize,
    chunks: Vec<String>,
}

impl LongReply {
    /// New sink bounded at `cap` characters per flushed message.
    pub fn new(cap: usize) -> Self {
        LongReply {
            cap,
            chunks: Vec::new(),
        }
    }

    /// Append one chunk. Chunks are kept whole: a flush boundary never
    /// splits inside a chunk.
    pub fn push(&mut self, chunk: impl Into<String>) {
        self.chunks.push(chunk.into());
    }

    /// Append every chunk of an iterator.
    pub fn extend<I, S>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for chunk in chunks {
            self.push(chunk);
        }
    }

    /// Concatenate buffered chunks into messages no longer than the cap and
    /// deliver them in order. One boundary check per chunk; a single chunk
    /// longer than the cap is sent on its own rather than dropped.
    pub async fn flush(self, env: &mut dyn Environment) -> CommandResult {
        let mut buf = String::new();
        for chunk in self.chunks {
            if !buf.is_empty() && char_len(&buf) + char_len(&chunk) > self.cap {
                env.output(&buf).await?;
                buf.clear();
            }
            buf.push_str(&chunk);
        }
        if !buf.is_empty() {
            env.output(&buf).await?;
        }
        Ok(())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CollectEnv {
        sent: Vec<String>,
    }

    #[async_trait]
    impl Environment for CollectEnv {
        async fn output(&mut self, text: &str) -> CommandResult {
            self.sent.push(text.to_owned());
            Ok(())
        }

        async fn check_permission(&self, _level: Permission) -> bool {
            true
        }

        fn message_cap(&self) -> usize {
            10
        }
    }

    #[tokio::test]
    async fn test_flush_concatenates_under_cap() {
        let mut env = CollectEnv { sent: vec![] };
        let mut sink = env.output_long();
        sink.push("abc");
        sink.push("def");
        sink.flush(&mut env).await.unwrap();
        assert_eq!(env.sent, ["abcdef"]);
    }

    #[tokio::test]
    async fn test_flush_splits_at_chunk_boundary() {
        let mut env = CollectEnv { sent: vec![] };
        let mut sink = env.output_long();
        sink.push("12345678");
        sink.push("abcde");
        sink.push("x");
        sink.flush(&mut env).await.unwrap();
        assert_eq!(env.sent, ["12345678", "abcdex"]);
    }

    #[tokio::test]
    async fn test_oversized_single_chunk_still_sent() {
        let mut env = CollectEnv { sent: vec![] };
        let mut sink = env.output_long();
        sink.push("this chunk is longer than ten characters");
        sink.flush(&mut env).await.unwrap();
        assert_eq!(env.sent.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_sink_sends_nothing() {
        let mut env = CollectEnv { sent: vec![] };
        let sink = env.output_long();
        sink.flush(&mut env).await.unwrap();
        assert!(env.sent.is_empty());
    }

    #[tokio::test]
    async fn test_reply_prefixes() {
        struct PrefixEnv(Vec<String>);

        #[async_trait]
        impl Environment for PrefixEnv {
            async fn output(&mut self, text: &str) -> CommandResult {
                self.0.push(text.to_owned());
                Ok(())
            }

            async fn check_permission(&self, _level: Permission) -> bool {
                true
            }

            fn reply_prefix(&self) -> String {
                "<@9>, ".to_owned()
            }
        }

        let mut env = PrefixEnv(vec![]);
        env.reply("pong").await.unwrap();
        assert_eq!(env.0, ["<@9>, pong"]);

        let mut sink = env.reply_long();
        sink.push("hello");
        sink.flush(&mut env).await.unwrap();
        assert_eq!(env.0[1], "<@9>, hello");
    }
}
