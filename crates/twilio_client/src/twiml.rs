//! TwiML writers for messaging and voice webhook responses
//!
//! Webhooks answer with a small XML document telling the provider what to do
//! next. Only the verbs the quiz flow needs are modelled.

use std::fmt::Write;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Reply document for an inbound SMS. Zero messages yields an empty
/// `<Response/>`, which acknowledges the webhook without replying.
#[derive(Debug, Default)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, body: impl Into<String>) -> Self {
        self.messages.push(body.into());
        self
    }

    pub fn to_xml(&self) -> String {
        if self.messages.is_empty() {
            return format!("{XML_HEADER}<Response/>");
        }
        let mut xml = format!("{XML_HEADER}<Response>");
        for message in &self.messages {
            let _ = write!(xml, "<Message>{}</Message>", escape(message));
        }
        xml.push_str("</Response>");
        xml
    }
}

/// Input mode of a `<Gather>` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherInput {
    Digits,
    Speech,
}

impl GatherInput {
    fn as_attr(self) -> &'static str {
        match self {
            GatherInput::Digits => "dtmf",
            GatherInput::Speech => "speech",
        }
    }
}

/// A `<Gather>` verb: collect digits or a speech transcript and post the
/// result to `action`.
#[derive(Debug, Clone)]
pub struct Gather {
    input: GatherInput,
    action: String,
    num_digits: Option<u32>,
    language: Option<String>,
    profanity_filter: Option<bool>,
}

impl Gather {
    pub fn digits(num_digits: u32, action: impl Into<String>) -> Self {
        Self {
            input: GatherInput::Digits,
            action: action.into(),
            num_digits: Some(num_digits),
            language: None,
            profanity_filter: None,
        }
    }

    pub fn speech(action: impl Into<String>) -> Self {
        Self {
            input: GatherInput::Speech,
            action: action.into(),
            num_digits: None,
            language: None,
            profanity_filter: None,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn profanity_filter(mut self, enabled: bool) -> Self {
        self.profanity_filter = Some(enabled);
        self
    }

    fn write_xml(&self, xml: &mut String) {
        let _ = write!(
            xml,
            r#"<Gather input="{}" action="{}""#,
            self.input.as_attr(),
            escape(&self.action)
        );
        if let Some(num_digits) = self.num_digits {
            let _ = write!(xml, r#" numDigits="{num_digits}""#);
        }
        if let Some(language) = &self.language {
            let _ = write!(xml, r#" language="{}""#, escape(language));
        }
        if let Some(enabled) = self.profanity_filter {
            let _ = write!(xml, r#" profanityFilter="{enabled}""#);
        }
        xml.push_str("/>");
    }
}

#[derive(Debug)]
enum Verb {
    Say { text: String, language: Option<String> },
    Gather(Gather),
    Redirect(String),
}

/// Reply document for a voice webhook.
#[derive(Debug, Default)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(self, text: impl Into<String>) -> Self {
        self.push(Verb::Say {
            text: text.into(),
            language: None,
        })
    }

    /// Speak `text` with an explicit language tag.
    pub fn say_in(self, text: impl Into<String>, language: impl Into<String>) -> Self {
        self.push(Verb::Say {
            text: text.into(),
            language: Some(language.into()),
        })
    }

    pub fn gather(self, gather: Gather) -> Self {
        self.push(Verb::Gather(gather))
    }

    /// Continue the call at another webhook URL once the verbs above finish.
    pub fn redirect(self, url: impl Into<String>) -> Self {
        self.push(Verb::Redirect(url.into()))
    }

    fn push(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    pub fn to_xml(&self) -> String {
        if self.verbs.is_empty() {
            return format!("{XML_HEADER}<Response/>");
        }
        let mut xml = format!("{XML_HEADER}<Response>");
        for verb in &self.verbs {
            match verb {
                Verb::Say { text, language } => {
                    match language {
                        Some(language) => {
                            let _ = write!(xml, r#"<Say language="{}">"#, escape(language));
                        }
                        None => xml.push_str("<Say>"),
                    }
                    let _ = write!(xml, "{}</Say>", escape(text));
                }
                Verb::Gather(gather) => gather.write_xml(&mut xml),
                Verb::Redirect(url) => {
                    let _ = write!(xml, "<Redirect>{}</Redirect>", escape(url));
                }
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messaging_response() {
        assert_eq!(
            MessagingResponse::new().to_xml(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response/>"#
        );
    }

    #[test]
    fn test_messaging_response_with_reply() {
        let xml = MessagingResponse::new().message("hello").to_xml();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Message>hello</Message></Response>"#
        );
    }

    #[test]
    fn test_voice_response_say_and_gather_digits() {
        let xml = VoiceResponse::new()
            .say_in("Please enter the 6 digit quiz I D.", "en-US")
            .gather(Gather::digits(6, "/gather-digits"))
            .redirect("/answer/")
            .to_xml();

        assert!(xml.contains(r#"<Say language="en-US">Please enter the 6 digit quiz I D.</Say>"#));
        assert!(xml.contains(r#"<Gather input="dtmf" action="/gather-digits" numDigits="6"/>"#));
        assert!(xml.ends_with("<Redirect>/answer/</Redirect></Response>"));
    }

    #[test]
    fn test_voice_response_speech_gather() {
        let xml = VoiceResponse::new()
            .gather(
                Gather::speech("/gather-speech")
                    .language("en-US")
                    .profanity_filter(true),
            )
            .to_xml();

        assert!(xml.contains(
            r#"<Gather input="speech" action="/gather-speech" language="en-US" profanityFilter="true"/>"#
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = MessagingResponse::new()
            .message("Tom & Jerry <3 \"quizzes\"")
            .to_xml();
        assert!(xml.contains("Tom &amp; Jerry &lt;3 &quot;quizzes&quot;"));

        let xml = VoiceResponse::new().say("a < b & c").to_xml();
        assert!(xml.contains("<Say>a &lt; b &amp; c</Say>"));
    }
}
