//! Subject and body templates.
//!
//! Placeholders are written `{name}`; `{{` and `}}` produce literal braces.
//! Known names are `invoice_number`, `order_number`, `total_amount` (alias
//! `total_ttc`) and `total_value`, matched exactly (`{ invoice_number }` is
//! unknown). A placeholder the record does not provide is an error rather
//! than being left in the output.

use crate::error::TemplateError;
use crate::models::invoice::InvoiceRecord;

/// Render a template against an invoice record.
pub fn render(template: &str, record: &InvoiceRecord) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    output.push('{');
                    continue;
                }

                let mut name = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    if next == '{' {
                        break;
                    }
                    name.push(next);
                }
                if !closed {
                    return Err(TemplateError::Malformed { position });
                }

                let value = record
                    .placeholder(&name)
                    .ok_or(TemplateError::UnknownField { name })?;
                output.push_str(&value);
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(TemplateError::Malformed { position });
                }
                output.push('}');
            }
            _ => output.push(c),
        }
    }

    Ok(output)
}
