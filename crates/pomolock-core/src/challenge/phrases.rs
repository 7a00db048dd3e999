//! Deterrent phrase corpus, one list per supported language.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Language of the deterrent phrases and alert texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "RU")]
    Ru,
    #[default]
    #[serde(rename = "EN")]
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Ru => "RU",
            Language::En => "EN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RU" => Ok(Language::Ru),
            "EN" => Ok(Language::En),
            other => Err(ConfigError::InvalidValue {
                key: "language".into(),
                message: format!("expected RU or EN, got '{other}'"),
            }),
        }
    }
}

const EN: &[&str] = &[
    "I understand that skipping this break makes me less focused.",
    "I choose to ignore my own rest and I accept the consequences.",
    "My eyes, back and brain deserve this break, but I am skipping it anyway.",
    "A tired mind makes slow progress, and I still want to skip.",
    "I promise to take a proper rest on the next break.",
    "Skipping rest today means borrowing energy from tomorrow.",
    "I am aware that regular breaks keep me productive for longer.",
    "This work will still be here in five minutes, yet I refuse to wait.",
    "I have read this sentence carefully and I really want to skip my break.",
    "Rest is part of the work, and I am deliberately skipping it.",
];

const RU: &[&str] = &[
    "Я понимаю, что пропуск перерыва снижает мою концентрацию.",
    "Я сознательно отказываюсь от отдыха и принимаю последствия.",
    "Мои глаза, спина и голова заслуживают перерыва, но я его пропускаю.",
    "Уставший мозг работает медленнее, и всё равно я хочу пропустить отдых.",
    "Я обещаю нормально отдохнуть на следующем перерыве.",
    "Пропуская отдых сегодня, я занимаю силы у завтрашнего дня.",
    "Я знаю, что регулярные перерывы помогают дольше оставаться продуктивным.",
    "Работа никуда не денется за пять минут, но я не хочу ждать.",
    "Я внимательно прочитал это предложение и действительно хочу пропустить перерыв.",
    "Отдых это часть работы, и я намеренно его пропускаю.",
];

/// All deterrent phrases for `language`.
pub fn corpus(language: Language) -> &'static [&'static str] {
    match language {
        Language::Ru => RU,
        Language::En => EN,
    }
}

/// Pick a phrase uniformly at random. Repeats across breaks are allowed.
pub fn pick<R: Rng + ?Sized>(language: Language, rng: &mut R) -> &'static str {
    let phrases = corpus(language);
    phrases[rng.gen_range(0..phrases.len())]
}
