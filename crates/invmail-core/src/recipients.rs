//! Order mapping file and recipient resolution.
//!
//! The mapping file has one entry per line:
//!
//! ```text
//! # order number : comma-separated recipients
//! CMD-2024-118:compta@client.fr, boss@client.fr
//! PO-7781:ap@acme.example
//! ```
//!
//! When an order number appears more than once, the first entry wins.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{ConfigError, RecipientError};
use crate::invoice::rules::patterns::EMAIL_ADDRESS;

/// One line of the mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub order_number: String,
    /// Recipients as written, trimmed, in file order.
    pub recipients: Vec<String>,
}

/// Read-only table from order number to recipients.
#[derive(Debug, Clone, Default)]
pub struct OrderMapping {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
}

impl OrderMapping {
    /// Load the mapping from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mapping = Self::parse(&content)?;
        debug!(
            "Loaded {} order mapping entries from {}",
            mapping.len(),
            path.display()
        );
        Ok(mapping)
    }

    /// Parse mapping file content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut mapping = Self::default();

        for (i, raw_line) in content.lines().enumerate() {
            let line_number = i + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (order, emails) = line.split_once(':').ok_or_else(|| ConfigError::Mapping {
                line: line_number,
                reason: "expected ORDER_NUMBER:email1,email2,...".to_string(),
            })?;

            let order_number = order.trim();
            if order_number.is_empty() {
                return Err(ConfigError::Mapping {
                    line: line_number,
                    reason: "empty order number".to_string(),
                });
            }

            let recipients: Vec<String> = emails
                .split(',')
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(String::from)
                .collect();
            if recipients.is_empty() {
                return Err(ConfigError::Mapping {
                    line: line_number,
                    reason: format!("no recipients listed for order {}", order_number),
                });
            }

            if mapping.index.contains_key(order_number) {
                warn!(
                    "Order {} listed again on line {}, keeping the first entry",
                    order_number, line_number
                );
                continue;
            }

            mapping
                .index
                .insert(order_number.to_string(), mapping.entries.len());
            mapping.entries.push(MappingEntry {
                order_number: order_number.to_string(),
                recipients,
            });
        }

        Ok(mapping)
    }

    /// Entry for an order number, if any.
    pub fn get(&self, order_number: &str) -> Option<&MappingEntry> {
        self.index.get(order_number).map(|&i| &self.entries[i])
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_ADDRESS.is_match(email)
}

/// Resolve the valid recipients of an order.
///
/// Invalid addresses are dropped with a warning; duplicates are removed while
/// keeping the first occurrence.
pub fn resolve(order_number: &str, mapping: &OrderMapping) -> Result<Vec<String>, RecipientError> {
    let entry = mapping
        .get(order_number)
        .ok_or_else(|| RecipientError::UnknownOrder(order_number.to_string()))?;

    let mut recipients: Vec<String> = Vec::with_capacity(entry.recipients.len());
    for email in &entry.recipients {
        if !validate_email(email) {
            warn!("Skipping invalid address '{}' for order {}", email, order_number);
            continue;
        }
        if !recipients.contains(email) {
            recipients.push(email.clone());
        }
    }

    if recipients.is_empty() {
        return Err(RecipientError::NoValidRecipient(order_number.to_string()));
    }

    info!("Found {} recipients for order {}", recipients.len(), order_number);
    Ok(recipients)
}
