use std::io::{self, Read};
use flate2::{Compression, write::GzEncoder, read::GzDecoder};

/// 魔数常量 - 用于标识文章包格式
pub const MAGIC_BYTES: &[u8] = b"BLOGP";

/// 当前写入的格式版本
pub const CURRENT_VERSION: [u8; 2] = [1, 0];

/// 头部长度：魔数 + 版本号(2字节) + 原始数据大小(4字节)
pub const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 解压前预分配容量相对压缩数据长度的上限倍数
const MAX_INITIAL_RATIO: usize = 8;

/// 解析后的文件头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleHeader {
    /// 主版本号和次版本号
    pub version: [u8; 2],
    /// 解压后的数据大小
    pub original_size: u32,
}

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化为压缩的二进制格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;
    let original_size = u32::try_from(binary.len()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidData, format!("数据过大: {} 字节", binary.len()))
    })?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    io::Write::write_all(&mut encoder, &binary)?;
    let compressed_data = encoder.finish()?;

    let mut output = Vec::with_capacity(HEADER_LEN + compressed_data.len());
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&original_size.to_le_bytes());
    output.extend_from_slice(&compressed_data);

    Ok(output)
}

/// 从压缩的二进制格式反序列化对象，使用当前版本作为最大版本
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    from_compressed_with_max_version(data, CURRENT_VERSION[0])
}

/// 从压缩的二进制格式反序列化对象，允许指定支持的最大版本
pub fn from_compressed_with_max_version<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let header = read_header(data, max_version)?;

    let compressed_data = &data[HEADER_LEN..];
    let expected_size = header.original_size as usize;

    // 预分配不超过压缩数据长度的 MAX_INITIAL_RATIO 倍；最多多读 1 字节以发现超长数据
    let initial_capacity = expected_size.min(compressed_data.len().saturating_mul(MAX_INITIAL_RATIO));
    let mut decompressed_data = Vec::with_capacity(initial_capacity);
    GzDecoder::new(compressed_data)
        .take(u64::from(header.original_size) + 1)
        .read_to_end(&mut decompressed_data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("解压失败: {}", e)))?;

    if decompressed_data.len() != expected_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
                header.original_size,
                decompressed_data.len()
            ),
        ));
    }

    from_binary(&decompressed_data)
}

/// 读取并校验文件头
pub fn read_header(data: &[u8], max_version: u8) -> Result<BundleHeader, io::Error> {
    if data.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("数据太短，无法解析: {} 字节", data.len()),
        ));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "无效的文件格式：魔数不匹配",
        ));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("不支持的版本: {}.{}", version[0], version[1]),
        ));
    }

    let size_offset = version_offset + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..size_offset + 4]);

    Ok(BundleHeader {
        version,
        original_size: u32::from_le_bytes(size_bytes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, PostBundle};

    fn bundle() -> PostBundle {
        PostBundle {
            posts: vec![
                Post::new(1, "Learn English Fast").with_category("Study"),
                Post::new(2, "IELTS Vocabulary")
                    .with_category("IELTS")
                    .with_excerpt("Words you need"),
            ],
        }
    }

    #[test]
    fn compressed_bundle_decodes_to_same_posts() {
        let data = to_compressed(&bundle(), CURRENT_VERSION).unwrap();
        assert_eq!(&data[..MAGIC_BYTES.len()], MAGIC_BYTES);
        assert_eq!(read_header(&data, CURRENT_VERSION[0]).unwrap().version, CURRENT_VERSION);

        let decoded: PostBundle = from_compressed(&data).unwrap();
        assert_eq!(decoded, bundle());
    }

    #[test]
    fn rejects_short_data() {
        let err = from_compressed::<PostBundle>(b"BLOGP").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut data = to_compressed(&bundle(), CURRENT_VERSION).unwrap();
        data[0] = b'X';
        let err = from_compressed::<PostBundle>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_newer_major_version() {
        let data = to_compressed(&bundle(), [CURRENT_VERSION[0] + 1, 0]).unwrap();
        assert!(from_compressed::<PostBundle>(&data).is_err());
        assert!(from_compressed_with_max_version::<PostBundle>(&data, CURRENT_VERSION[0] + 1).is_ok());
    }

    fn header_with_size(original_size: u32) -> Vec<u8> {
        let mut data = MAGIC_BYTES.to_vec();
        data.extend_from_slice(&CURRENT_VERSION);
        data.extend_from_slice(&original_size.to_le_bytes());
        data
    }

    #[test]
    fn huge_declared_size_with_junk_is_an_error() {
        let mut data = header_with_size(u32::MAX);
        data.extend_from_slice(b"junk");
        let err = from_compressed::<PostBundle>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn huge_declared_size_with_valid_payload_is_an_error() {
        let valid = to_compressed(&bundle(), CURRENT_VERSION).unwrap();
        let mut data = header_with_size(u32::MAX);
        data.extend_from_slice(&valid[HEADER_LEN..]);
        let err = from_compressed::<PostBundle>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn payload_longer_than_declared_is_rejected() {
        let valid = to_compressed(&bundle(), CURRENT_VERSION).unwrap();
        let mut data = header_with_size(1);
        data.extend_from_slice(&valid[HEADER_LEN..]);
        let err = from_compressed::<PostBundle>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn rejects_size_mismatch() {
        let mut data = to_compressed(&bundle(), CURRENT_VERSION).unwrap();
        let size_offset = MAGIC_BYTES.len() + 2;
        data[size_offset] = data[size_offset].wrapping_add(1);
        let err = from_compressed::<PostBundle>(&data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
