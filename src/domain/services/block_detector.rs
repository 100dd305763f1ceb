// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::models::page::{FetchResult, PageClassification};

static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("Invalid title regex")
});

static CAPTCHA_FORM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<form\b[^>]*\baction\s*=\s*["']?[^"'>]*captcha"#)
        .expect("Invalid captcha form regex")
});

/// 页面特征
enum Signature {
    /// `<title>` 中包含验证码字样
    CaptchaTitle,
    /// 表单 `action` 指向验证码
    CaptchaForm,
    /// 最终URL包含验证码字样
    CaptchaUrl,
    /// 页面文本包含指定片段
    Text(&'static str),
}

impl Signature {
    fn matches(&self, result: &FetchResult) -> bool {
        match self {
            Signature::CaptchaTitle => TITLE_REGEX
                .captures(&result.body)
                .and_then(|caps| caps.get(1))
                .is_some_and(|title| title.as_str().to_lowercase().contains("captcha")),
            Signature::CaptchaForm => CAPTCHA_FORM_REGEX.is_match(&result.body),
            Signature::CaptchaUrl => result.final_url.to_lowercase().contains("captcha"),
            Signature::Text(needle) => result.body.contains(needle),
        }
    }
}

/// 特征表，按顺序检查，先命中者生效；验证码特征排在中间页特征之前
const SIGNATURES: &[(Signature, PageClassification)] = &[
    (Signature::CaptchaTitle, PageClassification::Captcha),
    (Signature::CaptchaForm, PageClassification::Captcha),
    (Signature::CaptchaUrl, PageClassification::Captcha),
    (
        Signature::Text("Type the characters you see in this image"),
        PageClassification::Captcha,
    ),
    (
        Signature::Text("Enter the characters you see below"),
        PageClassification::Interstitial,
    ),
    (
        Signature::Text("Sorry, we just need to make sure you're not a robot"),
        PageClassification::Interstitial,
    ),
    (
        Signature::Text("To discuss automated access to Amazon data"),
        PageClassification::Interstitial,
    ),
    (
        Signature::Text("Continue shopping"),
        PageClassification::Interstitial,
    ),
];

/// 拦截检测器
///
/// 纯函数：相同的抓取结果总是得到相同的分类
pub struct BlockDetector;

impl BlockDetector {
    /// 对抓取结果进行分类
    ///
    /// # 参数
    ///
    /// * `result` - 抓取结果
    ///
    /// # 返回值
    ///
    /// 抓取出错时为 `FetchFailed`；否则为第一个命中的特征对应的分类，均未命中时为 `Normal`
    pub fn classify(result: &FetchResult) -> PageClassification {
        if result.error.is_some() {
            return PageClassification::FetchFailed;
        }

        SIGNATURES
            .iter()
            .find(|(signature, _)| signature.matches(result))
            .map(|(_, classification)| *classification)
            .unwrap_or(PageClassification::Normal)
    }
}
