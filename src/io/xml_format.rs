//! XML format handling
//!
//! Any element named `transaction`, `record` or `item` (ignoring case) is a
//! transaction, wherever it sits in the document. Its fields are read from
//! the first child element matching one of several accepted names.

use crate::io::fields::{parse_amount, parse_timestamp};
use crate::types::{ParsedTransaction, ProcessingError};
use log::warn;
use roxmltree::{Document, Node};

const RECORD_ELEMENTS: [&str; 3] = ["transaction", "record", "item"];
const CARD_NUMBER_ELEMENTS: [&str; 4] = ["cardNumber", "card_number", "card", "number"];
const TIMESTAMP_ELEMENTS: [&str; 4] = ["timestamp", "date", "time", "created"];
const AMOUNT_ELEMENTS: [&str; 3] = ["amount", "value", "sum"];

/// Parse an XML document into transactions
///
/// Record elements that miss a field or hold an unreadable value are skipped
/// with a warning.
///
/// # Errors
///
/// `ParseError` when the document is not well-formed XML.
pub fn parse_xml(content: &str) -> Result<Vec<ParsedTransaction>, ProcessingError> {
    let document = Document::parse(content)?;

    let mut transactions = Vec::new();
    for element in document.descendants().filter(is_record_element) {
        let line = Some(u64::from(document.text_pos_at(element.range().start).row));
        match convert_xml_element(element, line) {
            Ok(transaction) => transactions.push(transaction),
            Err(e) => warn!("Skipping XML record: {}", e),
        }
    }

    Ok(transactions)
}

fn is_record_element(node: &Node) -> bool {
    node.is_element()
        && RECORD_ELEMENTS
            .iter()
            .any(|name| node.tag_name().name().eq_ignore_ascii_case(name))
}

/// Convert one record element into a ParsedTransaction
pub fn convert_xml_element(
    element: Node,
    line: Option<u64>,
) -> Result<ParsedTransaction, ProcessingError> {
    let card_number = child_text(element, &CARD_NUMBER_ELEMENTS)
        .filter(|card| !card.is_empty())
        .ok_or_else(|| ProcessingError::missing_field(line, "cardNumber"))?;

    let timestamp = parse_timestamp(
        &child_text(element, &TIMESTAMP_ELEMENTS).unwrap_or_default(),
        line,
    )?;
    let amount = parse_amount(
        &child_text(element, &AMOUNT_ELEMENTS).unwrap_or_default(),
        line,
    )?;

    Ok(ParsedTransaction::new(card_number, amount, timestamp))
}

/// Trimmed text of the first child element matching a name, in name order
fn child_text(element: Node, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        element
            .children()
            .find(|child| child.is_element() && child.tag_name().name() == *name)
            .map(|child| {
                child
                    .descendants()
                    .filter(Node::is_text)
                    .filter_map(|text| text.text())
                    .collect::<String>()
                    .trim()
                    .to_string()
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_parse_xml_transactions() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<transactions>
  <transaction>
    <cardNumber>4532015112830366</cardNumber>
    <timestamp>2024-01-15T10:30:00Z</timestamp>
    <amount>100.50</amount>
  </transaction>
  <Record>
    <card_number> 5555555555554444 </card_number>
    <date>2024-01-16</date>
    <value>200.75</value>
  </Record>
</transactions>"#;

        let transactions = parse_xml(content).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].card_number, "4532015112830366");
        assert_eq!(transactions[0].amount, Decimal::new(10050, 2));
        assert_eq!(
            transactions[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
        assert_eq!(transactions[1].card_number, "5555555555554444");
        assert_eq!(
            transactions[1].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_xml_alternative_names_in_priority_order() {
        let content = "<items><item>\
            <number>9999</number><card>4111111111111111</card>\
            <created>2024-01-01</created><time>2024-02-01</time>\
            <sum>1</sum>\
            </item></items>";

        let transactions = parse_xml(content).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].card_number, "4111111111111111");
        assert_eq!(
            transactions[0].timestamp,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_xml_skips_incomplete_records() {
        let content = "<root>\
            <transaction><cardNumber>4111111111111111</cardNumber><amount>5</amount></transaction>\
            <transaction><cardNumber>4111111111111111</cardNumber><timestamp>2024-01-01</timestamp><amount>x</amount></transaction>\
            <transaction><cardNumber>378282246310005</cardNumber><timestamp>2024-01-01</timestamp><amount>5</amount></transaction>\
            </root>";

        let transactions = parse_xml(content).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].card_number, "378282246310005");
    }

    #[test]
    fn test_field_names_are_case_sensitive() {
        let content = "<transaction><CARDNUMBER>4111111111111111</CARDNUMBER>\
            <timestamp>2024-01-01</timestamp><amount>5</amount></transaction>";
        assert!(parse_xml(content).unwrap().is_empty());
    }

    #[test]
    fn test_parse_xml_malformed_document() {
        let result = parse_xml("<transactions><transaction></transactions>");
        assert!(matches!(
            result,
            Err(ProcessingError::ParseError { ref format, .. }) if format == "XML"
        ));
    }

    #[test]
    fn test_parse_xml_no_records() {
        assert!(parse_xml("<transactions/>").unwrap().is_empty());
    }
}
