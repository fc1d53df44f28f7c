use super::Company;
use crate::error::ExtractError;
use crate::report::{Event, Reporter};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use tracing::{debug, trace};

// All selectors are compile-time constants; parsing can only fail on malformed CSS.
lazy_static! {
    static ref ROW: Selector = selector("div.row.company.small.no-margin-top.list-filter-show");
    static ref RANK: Selector = selector(".rank.large");
    static ref NAME: Selector = selector("a.link.h5");
    static ref INDUSTRY: Selector = selector("ul.industry li");
    static ref LOCATION: Selector = selector("ul.location li");
    static ref PROFILE: Selector = selector("ul.review-link a");
    static ref QUOTE: Selector = selector("div.quote");
    static ref IMAGE: Selector = selector("img.image");
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("selector should be valid CSS")
}

/// Read every company row of the Fortune 100 page, in page order.
///
/// Rows missing a field, or with a rank that is not a number, are reported as skipped.
pub fn extract_companies(html: &str, reporter: &dyn Reporter) -> Vec<Company> {
    let document = Html::parse_document(html);
    let mut companies = vec![];
    for (i, row) in document.select(&ROW).enumerate() {
        match parse_row(i + 1, row) {
            Ok(company) => {
                trace!("row {}: [{}] {}", i + 1, company.rank, company.company);
                companies.push(company);
            }
            Err(err) => reporter.report(Event::Skipped {
                entity: &format!("row {}", i + 1),
                reason: &err,
            }),
        }
    }
    debug!("{} companies extracted", companies.len());
    companies
}

fn parse_row(row: usize, el: ElementRef<'_>) -> Result<Company, ExtractError> {
    let rank = text(row, el, &RANK, "rank")?;
    let rank = rank
        .parse()
        .map_err(|_| ExtractError::BadRank { row, rank })?;

    Ok(Company {
        rank,
        company: text(row, el, &NAME, "company")?,
        industry: text(row, el, &INDUSTRY, "industry")?,
        location: text(row, el, &LOCATION, "location")?,
        profile_url: attr(row, el, &PROFILE, "href", "profile url")?,
        employee_quote: text(row, el, &QUOTE, "quote")?,
        image_url: attr(row, el, &IMAGE, "src", "image url")?,
    })
}

// text of the first match, each text node trimmed and joined by a single space
fn text(
    row: usize,
    el: ElementRef<'_>,
    selector: &Selector,
    field: &'static str,
) -> Result<String, ExtractError> {
    el.select(selector)
        .next()
        .map(|found| {
            found
                .text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .ok_or(ExtractError::MissingField { row, field })
}

fn attr(
    row: usize,
    el: ElementRef<'_>,
    selector: &Selector,
    name: &str,
    field: &'static str,
) -> Result<String, ExtractError> {
    el.select(selector)
        .next()
        .and_then(|found| found.value().attr(name))
        .map(|value| value.trim().to_string())
        .ok_or(ExtractError::MissingField { row, field })
}

/// Extract the saved page at `html` and write the company list to `output`.
pub async fn run(html: &Path, output: &Path, reporter: &dyn Reporter) -> anyhow::Result<usize> {
    let page = crate::fs::read_text(html).await?;
    reporter.report(Event::Stage {
        name: "Fortune 100",
        total: 0,
    });
    let companies = extract_companies(&page, reporter);
    crate::fs::write_json(output, &companies).await?;
    reporter.report(Event::Saved {
        path: output,
        count: companies.len(),
    });
    Ok(companies.len())
}
