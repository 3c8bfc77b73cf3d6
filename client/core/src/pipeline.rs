//! Wordcount Pipeline Definitions
//!
//! The two streams the client manages. `words` reads text files from a
//! directory and splits them into words; `wordcount` taps the splitter output
//! and counts each word into a field-value counter of the same name.

use std::path::Path;

/// Source stream: files split into words
pub const WORD_STREAM: &str = "words";

/// Tap stream counting words, also the name of the counter it feeds
pub const WORDCOUNT_STREAM: &str = "wordcount";

/// Counter fed by [`WORDCOUNT_STREAM`]
pub const WORDCOUNT_COUNTER: &str = WORDCOUNT_STREAM;

/// Streams this client owns, in teardown order
pub const MANAGED_STREAMS: [&str; 2] = [WORDCOUNT_STREAM, WORD_STREAM];

/// Definition of [`WORDCOUNT_STREAM`]
pub const WORDCOUNT_STREAM_DEFINITION: &str = "tap:stream:words.splitter > transform \
     --expression=T(org.springframework.xd.tuple.TupleBuilder).tuple().of('word',payload) \
     | field-value-counter --fieldName=word";

/// Definition of [`WORD_STREAM`] reading from `input_dir`
#[must_use]
pub fn word_stream_definition(input_dir: &Path) -> String {
    format!(
        "file --dir={} --outputType=text/plain | splitter --expression=payload.split(' ')  | log",
        input_dir.display()
    )
}

/// Whether a stream is one of the managed streams
#[must_use]
pub fn is_managed_stream(name: &str) -> bool {
    MANAGED_STREAMS.contains(&name)
}
