//! Router directory page parsing.
//!
//! The directory page carries one `<select>` widget per sort order, each
//! holding the full router catalog:
//!
//! ```text
//! <select size="12" class="router_sort_country router_sort_stage">
//!     <option city="Lebanon" value="4">BeirutIX, Beirut, Lebanon</option>
//!     <option city="Singapore" value="9">SOX, Singapore, Singapore</option>
//! </select>
//! ```
//!
//! The option's `value` attribute is the router id the query endpoint
//! expects; the label is the comma-separated identity triplet.

use log::{debug, error, warn};
use scraper::{Html, Selector};

use crate::error_handling::DirectoryError;
use crate::models::Router;

/// Which of the directory page's select widgets to read.
///
/// All widgets list the same routers; the class attribute selects the sort
/// order the page renders them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Sorted by exchange name (`router_sort_ixp`)
    #[default]
    ByExchange,
    /// Sorted by city (`router_sort_city`)
    ByCity,
    /// Sorted by country (`router_sort_country`)
    ByCountry,
}

impl SortOrder {
    /// Class attribute of the matching select widget.
    pub fn class_attr(self) -> &'static str {
        match self {
            SortOrder::ByExchange => "router_sort_ixp",
            SortOrder::ByCity => "router_sort_city",
            SortOrder::ByCountry => "router_sort_country",
        }
    }
}

fn parse_selector(source: &str) -> Result<Selector, DirectoryError> {
    Selector::parse(source).map_err(|e| DirectoryError::Selector {
        selector: source.to_string(),
        message: e.to_string(),
    })
}

/// Extracts the router catalog from the directory page HTML.
///
/// Locates the select widget for `sort` and reads every option inside it.
/// Option labels are split into the `(ixp, city, country)` triplet with
/// surrounding whitespace trimmed; entries whose label is not a three-field
/// triplet are logged and skipped. A page without the widget yields
/// [`DirectoryError::WidgetNotFound`], recoverable by the caller as
/// "directory currently unobtainable".
pub fn parse_directory(html: &str, sort: SortOrder) -> Result<Vec<Router>, DirectoryError> {
    let class = sort.class_attr();
    let select_selector = parse_selector(&format!("select.{class}"))?;
    let option_selector = parse_selector("option")?;

    let document = Html::parse_document(html);
    let Some(select) = document.select(&select_selector).next() else {
        error!("Error finding the select tag with class {class}");
        return Err(DirectoryError::WidgetNotFound { class });
    };

    let mut routers = Vec::new();
    for option in select.select(&option_selector) {
        let id = option.value().attr("value").unwrap_or_default().to_string();
        let label = option.text().collect::<String>();

        let mut parts = label.splitn(3, ',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ixp), Some(city), Some(country)) => routers.push(Router {
                id,
                ixp: ixp.trim().to_string(),
                city: city.trim().to_string(),
                country: country.trim().to_string(),
            }),
            _ => warn!("Skipping malformed router option {:?}", label.trim()),
        }
    }

    debug!("{routers:?}");

    Ok(routers)
}
