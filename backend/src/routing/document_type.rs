//! Display type classification for uploaded files
//!
//! Business keywords in the file name take priority over the extension and the
//! declared MIME type.

const NAME_RULES: &[(&[&str], &str)] = &[
    (&["crm", "customer", "lead"], "CRM Data"),
    (&["sales", "revenue"], "Sales Report"),
    (&["campaign", "marketing"], "Marketing Data"),
    (&["feedback", "review"], "Customer Feedback"),
];

/// (extensions, MIME substrings, type)
const FORMAT_RULES: &[(&[&str], &[&str], &str)] = &[
    (&["csv"], &["csv"], "CSV Data"),
    (&["pdf"], &["pdf"], "PDF Document"),
    (&["xlsx", "xls"], &["spreadsheet"], "Spreadsheet"),
    (&[], &["image"], "Scanned Document"),
    (&["txt"], &["text"], "Text Document"),
];

const DEFAULT_TYPE: &str = "Business Document";

/// Classify a file into a human readable document type
pub fn classify_document_type(file_name: &str, mime_type: &str) -> &'static str {
    let lower_name = file_name.to_lowercase();
    let lower_mime = mime_type.to_lowercase();

    if let Some((_, label)) = NAME_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower_name.contains(k)))
    {
        return *label;
    }

    let extension = lower_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default();

    FORMAT_RULES
        .iter()
        .find(|(extensions, mimes, _)| {
            extensions.iter().any(|e| *e == extension) || mimes.iter().any(|m| lower_mime.contains(m))
        })
        .map(|(_, _, label)| *label)
        .unwrap_or(DEFAULT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_keywords_win() {
        assert_eq!(classify_document_type("customer_list.pdf", "application/pdf"), "CRM Data");
        assert_eq!(classify_document_type("Revenue.xlsx", ""), "Sales Report");
        assert_eq!(classify_document_type("q4-campaign.csv", "text/csv"), "Marketing Data");
        assert_eq!(classify_document_type("reviews.txt", "text/plain"), "Customer Feedback");
    }

    #[test]
    fn test_format_fallbacks() {
        assert_eq!(classify_document_type("data.csv", ""), "CSV Data");
        assert_eq!(classify_document_type("report", "application/pdf"), "PDF Document");
        assert_eq!(classify_document_type("budget.XLS", ""), "Spreadsheet");
        assert_eq!(
            classify_document_type(
                "sheet",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            ),
            "Spreadsheet"
        );
        assert_eq!(classify_document_type("scan.png", "image/png"), "Scanned Document");
        assert_eq!(classify_document_type("notes.txt", ""), "Text Document");
        assert_eq!(classify_document_type("notes", "text/markdown"), "Text Document");
    }

    #[test]
    fn test_unknown_is_business_document() {
        assert_eq!(
            classify_document_type("contract.docx", "application/msword"),
            "Business Document"
        );
        assert_eq!(classify_document_type("", ""), "Business Document");
    }
}
