//! Bank of Thailand daily rates (RDF/RSS `fxrate-all.xml`).
//!
//! Each `<item>` is one quote type for one currency. Only the average
//! buying sight bill and average selling rates are used; when both are
//! present the canonical rate is their running pairwise average in feed
//! order.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use cbrates_common::{Country, Currency, Rate};
use cbrates_fx::FeedError;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::client::FeedClient;
use crate::config::FeedConfig;
use crate::feed::{FeedFormat, HttpFeedGateway};

const BUYING_SIGHT_BILL: &str = "Bank of Thailand Average Buying Sight Bill";
const SELLING_RATE: &str = "Bank of Thailand Average Selling Rate";

/// Captures the nominal from e.g. `25.1596 Thai Baht = 100 JPY`.
static NOMINAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9\.]+ Thai Baht = ([0-9]+) [A-Z]{3}").expect("Invalid regex")
});

/// Bank of Thailand feed format.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThailandFeed;

/// Gateway for the Bank of Thailand.
pub type ThailandGateway = HttpFeedGateway<ThailandFeed>;

impl ThailandGateway {
    /// Create the Bank of Thailand gateway.
    pub fn thailand(client: FeedClient, config: FeedConfig) -> Self {
        HttpFeedGateway::new(Country::thailand(), ThailandFeed, client, config)
    }
}

impl FeedFormat for ThailandFeed {
    fn base_currency(&self) -> Currency {
        Currency::thb()
    }

    fn parse(&self, body: &[u8]) -> Result<Vec<Rate>, FeedError> {
        parse_rdf(body)
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Title,
    Description,
    TargetCurrency,
    Value,
}

#[derive(Debug, Default)]
struct Item {
    title: String,
    description: String,
    target_currency: String,
    value: String,
}

impl Item {
    fn push(&mut self, field: Field, text: &str) {
        match field {
            Field::Title => self.title.push_str(text),
            Field::Description => self.description.push_str(text),
            Field::TargetCurrency => self.target_currency.push_str(text),
            Field::Value => self.value.push_str(text),
        }
    }

    fn is_accepted_type(&self) -> bool {
        self.title.contains(BUYING_SIGHT_BILL) || self.title.contains(SELLING_RATE)
    }

    fn nominal(&self) -> Option<u32> {
        NOMINAL_PATTERN
            .captures(&self.description)?
            .get(1)?
            .as_str()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
    }

    /// Fold this item into `rates`. Returns an error for a value that is
    /// present but not a number, or an average that overflows.
    fn accumulate(self, rates: &mut BTreeMap<Currency, Rate>) -> Result<(), FeedError> {
        if !self.is_accepted_type() {
            return Ok(());
        }

        let Some(nominal) = self.nominal() else {
            debug!(description = %self.description, "Skipping item with unexpected description");
            return Ok(());
        };

        let code = self.target_currency.trim();
        let raw = self.value.trim();
        if code.is_empty() || raw.is_empty() {
            return Ok(());
        }

        let value = raw
            .parse::<Decimal>()
            .map_err(|_| FeedError::Parse(format!("invalid value {raw:?} for {code}")))?;

        let currency = Currency::new(code);
        let value = match rates.get(&currency) {
            Some(current) => value
                .checked_add(current.rate_target_to_base)
                .map(|sum| sum / Decimal::TWO)
                .ok_or_else(|| FeedError::Parse(format!("rate overflow for {code}")))?,
            None => value,
        };

        rates.insert(
            currency.clone(),
            Rate::new(nominal, Currency::thb(), currency, value),
        );
        Ok(())
    }
}

/// Parse the RDF feed into quotes priced in baht.
pub fn parse_rdf(body: &[u8]) -> Result<Vec<Rate>, FeedError> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut seen_root = false;
    let mut current: Option<Item> = None;
    let mut field: Option<Field> = None;
    let mut rates = BTreeMap::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(e) => {
                field = None;
                match e.local_name().as_ref() {
                    b"RDF" => seen_root = true,
                    b"item" => current = Some(Item::default()),
                    b"title" => field = Some(Field::Title),
                    b"description" => field = Some(Field::Description),
                    b"targetCurrency" => field = Some(Field::TargetCurrency),
                    b"value" => field = Some(Field::Value),
                    _ => {}
                }
            }
            Event::Empty(e) if e.local_name().as_ref() == b"RDF" => seen_root = true,
            Event::Text(text) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field) {
                    let text = text.unescape().map_err(xml_error)?;
                    item.push(field, &text);
                }
            }
            Event::CData(data) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field) {
                    item.push(field, &String::from_utf8_lossy(&data));
                }
            }
            Event::End(e) => {
                field = None;
                if e.local_name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        item.accumulate(&mut rates)?;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(FeedError::Parse("missing RDF element".to_string()));
    }

    Ok(rates.into_values().collect())
}

fn xml_error(err: quick_xml::Error) -> FeedError {
    FeedError::Parse(format!("xml unmarshal failed: {err}"))
}
