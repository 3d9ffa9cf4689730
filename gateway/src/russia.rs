//! Bank of Russia daily rates (`XML_daily.asp`).
//!
//! The document is `<ValCurs>` with one `<Valute>` per currency. Values use
//! a decimal comma and the body is declared `windows-1251`.

use cbrates_common::{Country, Currency, Rate};
use cbrates_fx::FeedError;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use rust_decimal::Decimal;
use tracing::warn;

use crate::client::FeedClient;
use crate::config::FeedConfig;
use crate::feed::{FeedFormat, HttpFeedGateway};

/// The bank rejects requests without a browser-like agent.
const REQUEST_USER_AGENT: &str = "Paw/3.3.5 (Macintosh; OS X/13.3.1) GCDHTTPRequest";
const REQUEST_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Bank of Russia feed format.
#[derive(Debug, Clone, Copy, Default)]
pub struct RussiaFeed;

/// Gateway for the Bank of Russia.
pub type RussiaGateway = HttpFeedGateway<RussiaFeed>;

impl RussiaGateway {
    /// Create the Bank of Russia gateway.
    pub fn russia(client: FeedClient, config: FeedConfig) -> Self {
        HttpFeedGateway::new(Country::russia(), RussiaFeed, client, config)
    }
}

impl FeedFormat for RussiaFeed {
    fn base_currency(&self) -> Currency {
        Currency::rur()
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(REQUEST_USER_AGENT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(REQUEST_CONTENT_TYPE));
        headers
    }

    fn parse(&self, body: &[u8]) -> Result<Vec<Rate>, FeedError> {
        parse_valcurs(body)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    CharCode,
    Nominal,
    Value,
}

#[derive(Debug, Default)]
struct Valute {
    char_code: String,
    nominal: String,
    value: String,
}

impl Valute {
    fn push(&mut self, field: Field, text: &str) {
        match field {
            Field::CharCode => self.char_code.push_str(text),
            Field::Nominal => self.nominal.push_str(text),
            Field::Value => self.value.push_str(text),
        }
    }

    fn into_rate(self) -> Option<Rate> {
        let code = self.char_code.trim();
        if code.is_empty() {
            return None;
        }

        let nominal = self.nominal.trim().parse::<u32>().ok().filter(|n| *n > 0)?;
        let value = self
            .value
            .trim()
            .replacen(',', ".", 1)
            .parse::<Decimal>()
            .ok()
            .filter(|v| *v > Decimal::ZERO)?;

        Some(Rate::new(nominal, Currency::rur(), Currency::new(code), value))
    }
}

/// Parse a `ValCurs` document into quotes priced in roubles.
///
/// Quotes with a missing code or an unparsable nominal or value are skipped.
pub fn parse_valcurs(body: &[u8]) -> Result<Vec<Rate>, FeedError> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut seen_root = false;
    let mut current: Option<Valute> = None;
    let mut field: Option<Field> = None;
    let mut quotes = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => {
                field = None;
                match e.local_name().as_ref() {
                    b"ValCurs" => seen_root = true,
                    b"Valute" => current = Some(Valute::default()),
                    b"CharCode" => field = Some(Field::CharCode),
                    b"Nominal" => field = Some(Field::Nominal),
                    b"Value" => field = Some(Field::Value),
                    _ => {}
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"ValCurs" => seen_root = true,
            Event::Text(text) => {
                if let (Some(valute), Some(field)) = (current.as_mut(), field) {
                    let text = text.unescape().map_err(xml_error)?;
                    valute.push(field, &text);
                }
            }
            Event::End(e) => {
                field = None;
                if e.local_name().as_ref() == b"Valute" {
                    if let Some(valute) = current.take() {
                        let code = valute.char_code.clone();
                        match valute.into_rate() {
                            Some(rate) => quotes.push(rate),
                            None => warn!(currency = %code, "Skipping malformed quote"),
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(FeedError::Parse("missing ValCurs element".to_string()));
    }

    Ok(quotes)
}

fn xml_error(err: quick_xml::Error) -> FeedError {
    FeedError::Parse(format!("xml unmarshal failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::http::{HeaderMap as RequestHeaders, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use cbrates_common::ManualClock;
    use cbrates_fx::FeedGateway;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    const DAILY: &str = r#"<ValCurs Date="18.04.2023" name="Foreign Currency Market">
  <Valute ID="R01010">
    <NumCode>036</NumCode>
    <CharCode>AUD</CharCode>
    <Nominal>1</Nominal>
    <Name>Australian Dollar</Name>
    <Value>54,8131</Value>
  </Valute>
  <Valute ID="R01020A">
    <NumCode>944</NumCode>
    <CharCode>AZN</CharCode>
    <Nominal>10</Nominal>
    <Name>Azerbaijan Manat</Name>
    <Value>48,0164</Value>
  </Valute></ValCurs>
"#;

    fn by_code(quotes: &[Rate], code: &str) -> Rate {
        quotes
            .iter()
            .find(|r| r.target_currency.code() == code)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_parse_daily() {
        let quotes = parse_valcurs(DAILY.as_bytes()).unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(
            by_code(&quotes, "AUD"),
            Rate::new(1, Currency::rur(), Currency::new("AUD"), dec!(54.8131))
        );
        assert_eq!(
            by_code(&quotes, "AZN"),
            Rate::new(10, Currency::rur(), Currency::new("AZN"), dec!(48.0164))
        );
    }

    #[test]
    fn test_malformed_quotes_are_skipped() {
        let body = DAILY
            .replace("<Value>54,8131</Value>", "<Value>some weird data</Value>")
            .replace("<Nominal>10</Nominal>", "<Nominal>0</Nominal>");
        let body = format!(
            "{}<Valute><CharCode>USD</CharCode><Nominal>1</Nominal><Value>81,5</Value></Valute></ValCurs>",
            body.trim_end().trim_end_matches("</ValCurs>")
        );

        let quotes = parse_valcurs(body.as_bytes()).unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].target_currency, Currency::usd());
        assert_eq!(quotes[0].rate_target_to_base, dec!(81.5));
    }

    #[test]
    fn test_windows_1251_document_is_accepted() {
        let mut body =
            br#"<?xml version="1.0" encoding="windows-1251"?><ValCurs><Valute><CharCode>USD</CharCode><Nominal>1</Nominal><Name>"#
                .to_vec();
        // "Доллар США" in windows-1251.
        body.extend_from_slice(&[0xC4, 0xEE, 0xEB, 0xEB, 0xE0, 0xF0, 0x20, 0xD1, 0xD8, 0xC0]);
        body.extend_from_slice(b"</Name><Value>81,7566</Value></Valute></ValCurs>");

        let quotes = parse_valcurs(&body).unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].rate_target_to_base, dec!(81.7566));
    }

    #[test]
    fn test_bad_xml() {
        assert!(matches!(
            parse_valcurs(b"<_q352462**)$5"),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            parse_valcurs(b"service temporarily unavailable"),
            Err(FeedError::Parse(_))
        ));
        assert!(matches!(
            parse_valcurs(b"<ValCurs><Valute></ValCurs>"),
            Err(FeedError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_gateway_fetch() {
        let router = Router::new().route(
            "/scripts/XML_daily.asp",
            get(|headers: RequestHeaders| async move {
                let agent = headers.get("user-agent").and_then(|v| v.to_str().ok());
                if agent != Some(REQUEST_USER_AGENT) {
                    return StatusCode::FORBIDDEN.into_response();
                }
                DAILY.into_response()
            }),
        );
        let base = serve(router).await;

        let client = FeedClient::new(Duration::from_secs(2), 1 << 20).unwrap();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2023, 4, 17, 22, 0, 0).unwrap());
        let gateway = RussiaGateway::russia(
            client,
            FeedConfig::new(format!("{base}/scripts/XML_daily.asp"), "Europe/Moscow"),
        )
        .with_clock(Arc::new(clock));

        let table = gateway.fetch().await.unwrap().unwrap();

        assert_eq!(gateway.country(), &Country::russia());
        assert_eq!(table.date_loaded, "2023-04-18");
        assert_eq!(table.rates.len(), 3);
        assert_eq!(
            table.get(&Currency::rur()),
            Some(&Rate::self_rate(Currency::rur()))
        );
        assert_eq!(table.get(&Currency::new("AZN")).unwrap().nominal, 10);
    }
}
