use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 文章发布状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Published,
    Draft,
}

/// 文章附件。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 文章的规范内存表示。
///
/// `content` 统一为拼接后的 Markdown 正文；块编辑器的行数组表示
/// 通过 [`Post::content_blocks`] 和 JSON 序列化层互转，调用方
/// 不需要区分两种表示。
///
/// `id` 的含义依存储策略而定：JSON 集合模式下是创建时间戳，
/// Markdown 文件模式下是文件当前的 sha（每次编辑都会变化），
/// 跨会话寻址一律使用 `slug`。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    pub title: String,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub read_time: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub cover_image: String,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,

    #[serde(default, with = "content_repr")]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// JSON 集合文件里 `content` 的两种历史表示：
/// 行数组（块编辑器产物）或单个正文字符串。
/// 序列化优先写出块数组，块数组拼不回原文时写原样字符串，
/// 反序列化两种都接受。
mod content_repr {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(content: &str, serializer: S) -> Result<S::Ok, S::Error> {
        // 连续空行、块尾空白等块数组表示不了的正文必须原样保留
        let blocks = super::split_blocks(content);
        if blocks.join("\n\n") == content {
            serializer.collect_seq(blocks)
        } else {
            serializer.serialize_str(content)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Blocks(Vec<String>),
            Body(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Blocks(blocks) => blocks.join("\n\n"),
            Repr::Body(body) => body,
        })
    }
}

fn split_blocks(content: &str) -> Vec<&str> {
    content
        .split("\n\n")
        .map(str::trim_end)
        .filter(|b| !b.trim().is_empty())
        .collect()
}

impl Post {
    /// 正文按块编辑器的行数组表示返回。
    pub fn content_blocks(&self) -> Vec<&str> {
        split_blocks(&self.content)
    }

    /// 没有显式 slug 时从标题生成。
    pub fn slug_or_generated(&self) -> String {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => slugify(&self.title),
        }
    }

    /// 序列化为带 front matter 的 Markdown 文件内容。
    ///
    /// 标量字段逐个写成双引号字符串（内嵌引号反斜杠转义），
    /// `tags` 写成方括号引号列表，空行之后是正文。
    pub fn to_markdown(&self) -> String {
        let date = if self.date.is_empty() {
            Utc::now().to_rfc3339()
        } else {
            self.date.clone()
        };

        let status = match self.status {
            Status::Published => "published",
            Status::Draft => "draft",
        };

        let tags = self
            .tags
            .iter()
            .map(|t| format!("\"{}\"", quote_escape(t)))
            .collect::<Vec<_>>()
            .join(", ");

        let frontmatter = [
            "---".to_string(),
            format!("title: \"{}\"", quote_escape(&self.title)),
            format!("date: \"{}\"", quote_escape(&date)),
            format!("category: \"{}\"", quote_escape(&self.category)),
            format!("readTime: \"{}\"", quote_escape(&self.read_time)),
            format!("excerpt: \"{}\"", quote_escape(&self.excerpt)),
            format!("coverImage: \"{}\"", quote_escape(&self.cover_image)),
            format!("status: \"{}\"", status),
            format!("tags: [{}]", tags),
            "---".to_string(),
            String::new(),
        ]
        .join("\n");

        frontmatter + &self.content
    }

    /// 从 Markdown 文件内容解析文章。
    ///
    /// `slug` 来自文件名，`sha` 作为当前 revision 指针填入 `id`。
    pub fn from_markdown(raw: &str, slug: &str, sha: &str) -> Result<Self> {
        let (yaml, body) = extract_front_matter_and_body(raw)?;
        let fm: FrontMatter = serde_yaml::from_str(yaml)?;

        Ok(Self {
            id: Some(sha.to_string()),
            slug: Some(slug.to_string()),
            title: fm.title,
            date: fm.date,
            category: fm.category,
            read_time: fm.read_time,
            excerpt: fm.excerpt,
            cover_image: fm.cover_image,
            status: fm.status,
            tags: fm.tags,
            attachments: Vec::new(),
            content: body.to_string(),
            created_at: None,
        })
    }
}

#[derive(Deserialize)]
struct FrontMatter {
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    category: String,
    #[serde(default, rename = "readTime")]
    read_time: String,
    #[serde(default)]
    excerpt: String,
    #[serde(default, rename = "coverImage")]
    cover_image: String,
    #[serde(default)]
    status: Status,
    #[serde(default)]
    tags: Vec<String>,
}

/// 从原始 Markdown 内容中提取 front matter 字符串和正文。
fn extract_front_matter_and_body(content: &str) -> Result<(&str, &str)> {
    const DELIM: &str = "---";

    let content = content.trim_start();

    if !content.starts_with(DELIM) {
        return Err(Error::FormatError("missing required front matter"));
    }

    let rest = &content[DELIM.len()..];
    let end_pos = rest.find(DELIM).ok_or(Error::FormatError(
        "front matter does not terminate with expected delimiter ---",
    ))?;

    let yaml = &rest[..end_pos];
    let body = rest[end_pos + DELIM.len()..].trim_start();

    Ok((yaml.trim(), body))
}

fn quote_escape(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// 从标题生成 URL slug。
///
/// 小写化、折叠变音符号为 ASCII，非字母数字的连续段压成单个连字符。
/// 幂等：对已经是 slug 的输入返回原值。
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;

    let mut push = |c: char, out: &mut String| {
        let lower = c.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(lower);
        } else {
            pending_sep = true;
        }
    };

    for c in title.chars() {
        match fold_diacritic(c) {
            Some(folded) => folded.chars().for_each(|f| push(f, &mut out)),
            None => push(c, &mut out),
        }
    }

    out
}

/// 常见拉丁变音字符折叠表，表外字符返回 `None`。
fn fold_diacritic(c: char) -> Option<&'static str> {
    let folded = match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => "e",
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => "i",
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => "o",
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => "u",
        'ç' | 'Ç' => "c",
        'ñ' | 'Ñ' => "n",
        'ý' | 'ÿ' | 'Ý' => "y",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ß' => "ss",
        _ => return None,
    };
    Some(folded)
}

/// 宽容地解析文章日期用于排序。
///
/// 接受 RFC 3339 和常见的日期格式；解析失败或为空按 epoch 处理，
/// 这样缺日期的文章排在列表末尾而不是让整个列表报错。
pub fn parse_date(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }

    for fmt in &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return naive.and_utc();
        }
    }

    for fmt in &["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return naive.and_utc();
            }
        }
    }

    DateTime::UNIX_EPOCH
}
