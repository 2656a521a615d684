use std::io::Read;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::{ContentsError, ContentsResult};

/// Inflate a gzip payload into UTF-8 text
///
/// The whole payload is decoded into memory. Concatenated gzip members are
/// decoded one after another, and an empty payload yields empty text.
pub fn decompress(data: &[u8]) -> ContentsResult<String> {
    if data.is_empty() {
        return Ok(String::new());
    }

    let mut decoder = MultiGzDecoder::new(data);
    let mut buf = Vec::new();
    decoder
        .read_to_end(&mut buf)
        .map_err(ContentsError::Format)?;

    debug!("Decompressed {} bytes into {} bytes", data.len(), buf.len());

    Ok(String::from_utf8(buf)?)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use flate2::{write::GzEncoder, Compression};

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decompress_text() {
        let s = "usr/bin/apt\tadmin/apt\nusr/bin/dpkg\tadmin/dpkg\n";
        assert_eq!(decompress(&gzip(s.as_bytes())).unwrap(), s);
    }

    #[test]
    fn test_decompress_multi_member() {
        let mut data = gzip(b"usr/bin/apt admin/apt\n");
        data.extend(gzip(b"usr/bin/dpkg admin/dpkg\n"));

        assert_eq!(
            decompress(&data).unwrap(),
            "usr/bin/apt admin/apt\nusr/bin/dpkg admin/dpkg\n"
        );
    }

    #[test]
    fn test_decompress_high_ratio() {
        let s = "usr/share/doc/foo/changelog.gz\tdoc/foo\n".repeat(50_000);
        let data = gzip(s.as_bytes());
        assert!(data.len() * 4 < s.len());

        assert_eq!(decompress(&data).unwrap(), s);
    }

    #[test]
    fn test_decompress_empty() {
        assert_eq!(decompress(&[]).unwrap(), "");
    }

    #[test]
    fn test_decompress_not_gzip() {
        let res = decompress(b"this is plain text, not a gzip stream");
        assert!(matches!(res, Err(ContentsError::Format(_))));
    }

    #[test]
    fn test_decompress_not_utf8() {
        let res = decompress(&gzip(&[0x66, 0x6f, 0xff, 0xfe, 0x0a]));
        assert!(matches!(res, Err(ContentsError::Encoding(_))));
    }
}
