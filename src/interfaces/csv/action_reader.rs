use crate::domain::document::DocumentReference;
use crate::error::{Result, WizardError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Set,
    Flag,
    Attach,
    Remove,
    Contact,
    Continue,
    Back,
    Edit,
}

/// One scripted user gesture: `action, field, value`.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Action {
    pub action: ActionKind,
    pub field: Option<String>,
    pub value: Option<String>,
}

impl Action {
    pub fn field(&self) -> Result<&str> {
        self.field
            .as_deref()
            .ok_or_else(|| WizardError::validation("field", "this action needs a field name"))
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn flag(&self) -> Result<bool> {
        match self.value().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            other => Err(WizardError::validation(
                self.field()?,
                format!("expected true or false, got `{other}`"),
            )),
        }
    }

    /// Parses an `attach` value of the form `name:bytes`.
    pub fn document(&self) -> Result<DocumentReference> {
        let field = self.field()?;
        let (name, size) = self
            .value()
            .rsplit_once(':')
            .ok_or_else(|| WizardError::validation(field, "expected `name:bytes`"))?;
        let size = size
            .trim()
            .parse::<u64>()
            .map_err(|_| WizardError::validation(field, format!("invalid size `{size}`")))?;
        let name = name.trim();
        Ok(DocumentReference::new(name, size, format!("file:///{name}")))
    }
}

/// Reads scripted wizard actions from a CSV source.
///
/// Whitespace around values is trimmed and short rows are accepted, so
/// `continue` can stand alone on its line.
pub struct ActionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ActionReader<R> {
    /// Creates a new `ActionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes actions, one `Result` per row.
    pub fn actions(self) -> impl Iterator<Item = Result<Action>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(WizardError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_stream() {
        let data = "action, field, value\nset, mobile, 9876543210\ncontinue\nflag, consent, yes";
        let reader = ActionReader::new(data.as_bytes());
        let results: Vec<Result<Action>> = reader.actions().collect();

        assert_eq!(results.len(), 3);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.action, ActionKind::Set);
        assert_eq!(first.field().unwrap(), "mobile");
        assert_eq!(first.value(), "9876543210");

        let second = results[1].as_ref().unwrap();
        assert_eq!(second.action, ActionKind::Continue);
        assert_eq!(second.field, None);

        assert!(results[2].as_ref().unwrap().flag().unwrap());
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "action, field, value\njump, mobile, 1";
        let reader = ActionReader::new(data.as_bytes());
        let results: Vec<Result<Action>> = reader.actions().collect();

        assert!(results[0].is_err());
    }

    #[test]
    fn test_attach_value() {
        let data = "action, field, value\nattach, sale_deed, deed.pdf:2097152\nattach, sale_deed, deed.pdf";
        let results: Vec<Result<Action>> = ActionReader::new(data.as_bytes()).actions().collect();

        let doc = results[0].as_ref().unwrap().document().unwrap();
        assert_eq!(doc.name, "deed.pdf");
        assert_eq!(doc.size_bytes, 2 * 1024 * 1024);
        assert!(results[1].as_ref().unwrap().document().is_err());
    }

    #[test]
    fn test_bad_flag() {
        let action = Action {
            action: ActionKind::Flag,
            field: Some("consent".into()),
            value: Some("maybe".into()),
        };
        assert!(action.flag().is_err());
    }
}
