//! Supported dialects and their prompt profiles.
//!
//! The table is static: adding a dialect means adding a `Dialect` variant and a
//! matching entry in `PROFILES`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Korean regional dialect the service can translate into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Jeju Island
    #[default]
    Jeju,
    /// Gyeongsang provinces
    Gyeongsang,
    /// Jeolla provinces
    Jeolla,
    /// Gangwon province
    Gangwon,
}

/// A worked translation example embedded in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectExample {
    /// Standard Korean input.
    pub input: &'static str,
    /// The same sentence in the dialect.
    pub output: &'static str,
}

/// Style instruction and example for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    /// The dialect this profile describes.
    pub dialect: Dialect,
    /// Human-readable name shown in the selector.
    pub label: &'static str,
    /// Natural-language style instruction for the model.
    pub description: &'static str,
    /// Worked example pair.
    pub example: DialectExample,
}

static PROFILES: [DialectProfile; 4] = [
    DialectProfile {
        dialect: Dialect::Jeju,
        label: "제주도 방언",
        description: "제주도 방언으로 자연스럽게 번역해줘. 제주도의 특유 억양과 어투를 살려서 제주 사람들끼리 대화하는 느낌을 잘 살려줘.",
        example: DialectExample {
            input: "오늘 날씨가 참 좋네. 점심 먹고 산책 갈래?",
            output: "혼저 옵서게. 오늘 하르방도 좋아보난 점심 먹곡 혼디 산굿이나 갈래?",
        },
    },
    DialectProfile {
        dialect: Dialect::Gyeongsang,
        label: "경상도 방언",
        description: "1980년대 경상도 시골 마을 친구들 사이에서 오가는 대화처럼, 자연스럽고 정감 있는 경상도 사투리로 번역해줘.",
        example: DialectExample {
            input: "밥 먹었어? 저녁에 시간 있으면 같이 놀자.",
            output: "밥 묵었나? 저녁에 시간 있으면 같이 놀자카이.",
        },
    },
    DialectProfile {
        dialect: Dialect::Jeolla,
        label: "전라도 방언",
        description: "전라도 방언으로 번역해줘. 전라도 사람들끼리 나누는 친근하고 푸근한 대화 느낌을 살려서 번역해줘.",
        example: DialectExample {
            input: "오늘 어디 가? 나도 같이 가면 안 될까?",
            output: "오늘 어디 가당가? 나도 함 따라가볼라잉?",
        },
    },
    DialectProfile {
        dialect: Dialect::Gangwon,
        label: "강원도 방언",
        description: "강원도 방언으로 자연스럽게 번역해줘. 강원도 특유의 구수한 억양과 편안한 분위기를 살려서 대화체로 표현해줘.",
        example: DialectExample {
            input: "밖에 날씨가 추운데 따뜻한 차 한 잔 어때?",
            output: "밖에 날씨가 어째 많이 춥재? 따숩게 차 한 잔 허는 거 어떻대?",
        },
    },
];

impl Dialect {
    /// Every supported dialect, in selector order.
    pub const ALL: [Dialect; 4] = [
        Dialect::Jeju,
        Dialect::Gyeongsang,
        Dialect::Jeolla,
        Dialect::Gangwon,
    ];

    /// The wire key used in requests.
    pub fn key(&self) -> &'static str {
        match self {
            Dialect::Jeju => "jeju",
            Dialect::Gyeongsang => "gyeongsang",
            Dialect::Jeolla => "jeolla",
            Dialect::Gangwon => "gangwon",
        }
    }

    /// Look up a dialect by its wire key. Surrounding whitespace is ignored.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|d| d.key() == key)
    }

    /// The prompt profile for this dialect.
    pub fn profile(&self) -> &'static DialectProfile {
        match self {
            Dialect::Jeju => &PROFILES[0],
            Dialect::Gyeongsang => &PROFILES[1],
            Dialect::Jeolla => &PROFILES[2],
            Dialect::Gangwon => &PROFILES[3],
        }
    }

    /// Comma-separated list of valid keys, for error messages.
    pub fn valid_keys() -> String {
        Self::ALL.iter().map(|d| d.key()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| {
            format!(
                "Unknown dialect '{}'. Must be one of: {}",
                s,
                Self::valid_keys()
            )
        })
    }
}

/// Public description of a dialect, as listed by `GET /api/dialects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialectInfo {
    /// Wire key
    pub key: String,
    /// Display label
    pub label: String,
    /// Style instruction
    pub description: String,
    /// Whether the client should preselect this dialect
    pub is_default: bool,
}

impl From<&DialectProfile> for DialectInfo {
    fn from(profile: &DialectProfile) -> Self {
        Self {
            key: profile.dialect.key().to_string(),
            label: profile.label.to_string(),
            description: profile.description.to_string(),
            is_default: profile.dialect == Dialect::default(),
        }
    }
}

/// List every dialect in selector order.
pub fn list_dialects() -> Vec<DialectInfo> {
    Dialect::ALL.iter().map(|d| d.profile().into()).collect()
}
