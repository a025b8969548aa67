//! Reduces the upstream JSON documents to display strings.
//!
//! Upstream text is trusted and inserted verbatim; nothing is escaped.

use crate::domain::model::{
    DictionaryDirections, DictionaryResult, Directions, Service, TranslationDirections,
    TranslationResult, UpstreamReply, LINE_SEPARATOR,
};
use crate::utils::error::Result;

pub fn decode_directions(service: Service, body: &[u8]) -> Result<Directions> {
    let directions = match service {
        Service::Translation => {
            Directions::Translation(serde_json::from_slice::<TranslationDirections>(body)?)
        }
        Service::Dictionary => {
            Directions::Dictionary(serde_json::from_slice::<DictionaryDirections>(body)?)
        }
    };
    Ok(directions)
}

pub fn decode_reply(service: Service, body: &[u8]) -> Result<UpstreamReply> {
    let reply = match service {
        Service::Translation => {
            UpstreamReply::Translation(serde_json::from_slice::<TranslationResult>(body)?)
        }
        Service::Dictionary => {
            UpstreamReply::Dictionary(serde_json::from_slice::<DictionaryResult>(body)?)
        }
    };
    Ok(reply)
}

pub fn render_translation(result: &TranslationResult) -> String {
    result.text.join(LINE_SEPARATOR)
}

/// Renders each article as a header line followed by its translations.
///
/// ```text
/// time [taɪm] (noun)
/// время (существительное)
///   раз (существительное)
/// ```
///
/// Synonyms, meanings and examples are decoded but not rendered.
pub fn render_dictionary(result: &DictionaryResult) -> String {
    let indent = format!("{}  ", LINE_SEPARATOR);

    result
        .def
        .iter()
        .map(|article| {
            let mut header = article.text.clone();
            if !article.ts.is_empty() {
                header.push_str(&format!(" [{}] ", article.ts));
            }
            if !article.pos.is_empty() {
                header.push_str(&format!("({})", article.pos));
            }

            let translations = article
                .tr
                .iter()
                .map(|entry| format!("{} ({})", entry.text, entry.pos))
                .collect::<Vec<_>>()
                .join(&indent);

            format!("{}{}{}", header, LINE_SEPARATOR, translations)
        })
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR)
}

impl UpstreamReply {
    pub fn render(&self) -> String {
        match self {
            UpstreamReply::Translation(result) => render_translation(result),
            UpstreamReply::Dictionary(result) => render_dictionary(result),
        }
    }
}
