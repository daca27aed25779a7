//! Minimal RESP2 codec: command encoding and single-reply decoding.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::ProbeError;

/// Largest bulk reply accepted. Health and handshake replies are tiny.
const MAX_BULK_LEN: usize = 4 * 1024;

/// Largest reply line accepted, excluding the trailing CRLF.
const MAX_LINE_LEN: usize = 4 * 1024;

/// A decoded server reply. Arrays are not needed for the handshake or
/// health commands and are reported as protocol errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Option<Vec<u8>>),
}

/// Encode a command as a RESP array of bulk strings.
pub fn encode_command(args: &[&[u8]]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + args.iter().map(|a| a.len() + 16).sum::<usize>());
    buf.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
    for arg in args {
        buf.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
        buf.extend_from_slice(arg);
        buf.extend_from_slice(b"\r\n");
    }
    buf
}

/// Read exactly one reply from `reader`.
pub async fn read_reply<R>(reader: &mut R) -> Result<Reply, ProbeError>
where
    R: AsyncBufRead + Unpin,
{
    let line = read_line(reader).await?;
    let body = line.get(1..).unwrap_or_default();

    match line.as_bytes()[0] {
        b'+' => Ok(Reply::Simple(body.to_string())),
        b'-' => Ok(Reply::Error(body.to_string())),
        b':' => body
            .parse()
            .map(Reply::Integer)
            .map_err(|_| ProbeError::Protocol(format!("invalid integer reply {body:?}"))),
        b'$' => {
            let len: i64 = body
                .parse()
                .map_err(|_| ProbeError::Protocol(format!("invalid bulk length {body:?}")))?;
            if len < 0 {
                return Ok(Reply::Bulk(None));
            }
            let len = usize::try_from(len)
                .ok()
                .filter(|len| *len <= MAX_BULK_LEN)
                .ok_or_else(|| ProbeError::Protocol(format!("bulk length {len} too large")))?;
            let mut data = vec![0u8; len + 2];
            reader.read_exact(&mut data).await.map_err(eof_as_closed)?;
            if !data.ends_with(b"\r\n") {
                return Err(ProbeError::Protocol("bulk reply missing terminator".into()));
            }
            data.truncate(len);
            Ok(Reply::Bulk(Some(data)))
        }
        other => Err(ProbeError::Protocol(format!(
            "unexpected reply type {:?}",
            char::from(other)
        ))),
    }
}

async fn read_line<R>(reader: &mut R) -> Result<String, ProbeError>
where
    R: AsyncBufRead + Unpin,
{
    let mut raw = Vec::new();
    let limit = (MAX_LINE_LEN + 2) as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut raw).await?;
    if n == 0 {
        return Err(ProbeError::Closed);
    }
    if !raw.ends_with(b"\n") && raw.len() as u64 == limit {
        return Err(ProbeError::Protocol(format!(
            "reply line longer than {MAX_LINE_LEN} bytes"
        )));
    }
    if !raw.ends_with(b"\r\n") {
        return Err(ProbeError::Protocol("reply line missing terminator".into()));
    }
    raw.truncate(raw.len() - 2);
    if raw.is_empty() {
        return Err(ProbeError::Protocol("empty reply line".into()));
    }
    String::from_utf8(raw).map_err(|_| ProbeError::Protocol("reply line is not UTF-8".into()))
}

fn eof_as_closed(e: std::io::Error) -> ProbeError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ProbeError::Closed
    } else {
        ProbeError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn decode(mut input: &[u8]) -> Result<Reply, ProbeError> {
        read_reply(&mut input).await
    }

    #[test]
    fn test_encode_ping() {
        assert_eq!(encode_command(&[b"PING".as_slice()]), b"*1\r\n$4\r\nPING\r\n");
        assert_eq!(
            encode_command(&[b"SELECT".as_slice(), b"12".as_slice()]),
            b"*2\r\n$6\r\nSELECT\r\n$2\r\n12\r\n"
        );
    }

    #[tokio::test]
    async fn test_decode_replies() {
        assert_eq!(decode(b"+PONG\r\n").await.unwrap(), Reply::Simple("PONG".into()));
        assert_eq!(
            decode(b"-NOAUTH Authentication required.\r\n").await.unwrap(),
            Reply::Error("NOAUTH Authentication required.".into())
        );
        assert_eq!(decode(b":42\r\n").await.unwrap(), Reply::Integer(42));
        assert_eq!(decode(b"$4\r\nPONG\r\n").await.unwrap(), Reply::Bulk(Some(b"PONG".to_vec())));
        assert_eq!(decode(b"$-1\r\n").await.unwrap(), Reply::Bulk(None));
    }

    #[tokio::test]
    async fn test_decode_failures() {
        assert!(matches!(decode(b"").await, Err(ProbeError::Closed)));
        assert!(matches!(decode(b"$4\r\nPO").await, Err(ProbeError::Closed)));
        assert!(matches!(decode(b"+PONG").await, Err(ProbeError::Protocol(_))));
        assert!(matches!(decode(b"*1\r\n$4\r\nPONG\r\n").await, Err(ProbeError::Protocol(_))));
        assert!(matches!(decode(b":abc\r\n").await, Err(ProbeError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_oversized_replies_rejected() {
        let mut long_line = vec![b'+'; MAX_LINE_LEN + 64];
        long_line.extend_from_slice(b"\r\n");
        let err = decode(&long_line).await.unwrap_err();
        assert!(err.to_string().contains("longer than"), "{err}");

        let huge_bulk = format!("${}\r\n", 512 * 1024 * 1024);
        let err = decode(huge_bulk.as_bytes()).await.unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");

        let mut max_line = vec![b'+'; MAX_LINE_LEN];
        max_line.extend_from_slice(b"\r\n");
        assert!(matches!(decode(&max_line).await, Ok(Reply::Simple(_))));
    }
}
