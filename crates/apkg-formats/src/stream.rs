//! Stream length helpers shared by the parsers

use std::io::{Seek, SeekFrom};

/// Total length of the stream; the cursor is restored afterwards
pub(crate) fn stream_len<S: Seek>(stream: &mut S) -> std::io::Result<u64> {
    let pos = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    if pos != end {
        stream.seek(SeekFrom::Start(pos))?;
    }
    Ok(end)
}

/// Bytes left between the cursor and end of stream
pub(crate) fn remaining_len<S: Seek>(stream: &mut S) -> std::io::Result<u64> {
    let pos = stream.stream_position()?;
    Ok(stream_len(stream)?.saturating_sub(pos))
}
