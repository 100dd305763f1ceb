// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::debug;

/// 从 Content-Type 头中解析字符集
///
/// 未声明或无法识别的字符集返回 `None`
pub fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches('"').as_bytes())
    })
}

/// 检测字节序列的编码
///
/// 合法的UTF-8直接采用；否则交给 chardetng 猜测
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// 将响应体解码为UTF-8字符串
///
/// # 参数
///
/// * `bytes` - 原始响应体（可能已被截断）
/// * `content_type` - 响应的 Content-Type 头
///
/// # 返回值
///
/// 解码后的文本；BOM 优先于声明的字符集，无法映射的字节替换为 U+FFFD
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .unwrap_or_else(|| detect_encoding(bytes));

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(encoding = used.name(), "Body contained malformed sequences");
    }
    text.into_owned()
}
