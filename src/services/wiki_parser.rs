use anyhow::{anyhow, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// 从榜单行解析出的影片（条目页补充之前）
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFilm {
    pub title: String,
    pub release_year: Option<i32>,
    pub box_office: f64,
    /// 条目页相对链接，如 /wiki/Avatar_(2009_film)
    pub article_href: Option<String>,
}

/// 条目页信息框里补充的字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmDetails {
    pub director: Option<String>,
    pub country: Option<String>,
}

/// 表头解析出的列位置
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    title: usize,
    year: Option<usize>,
    box_office: usize,
}

/// 维基榜单解析器
pub struct WikiFilmParser {
    footnote_regex: Regex,
    money_regex: Regex,
    year_regex: Regex,
    title_year_regex: Regex,
    separator_regex: Regex,
}

impl Default for WikiFilmParser {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiFilmParser {
    pub fn new() -> Self {
        Self {
            // 形如 [1] [23] 的引用标注
            footnote_regex: Regex::new(r"\[\d+\]")
                .expect("Invalid footnote regex pattern - this is a programming error"),
            // 金额里除数字和小数点之外的所有字符
            money_regex: Regex::new(r"[^0-9.]")
                .expect("Invalid money regex pattern - this is a programming error"),
            // 匹配年份: 1997, 2019 等
            year_regex: Regex::new(r"\b(19\d{2}|20\d{2})\b")
                .expect("Invalid year regex pattern - this is a programming error"),
            // 标题里内嵌的年份，如 "Titanic (1997)"
            title_year_regex: Regex::new(r"\s*\((\d{4})\)")
                .expect("Invalid title year regex pattern - this is a programming error"),
            // 多人/多国取第一个时的分隔
            separator_regex: Regex::new(r",|\band\b|;|\|")
                .expect("Invalid separator regex pattern - this is a programming error"),
        }
    }

    /// 在页面里找票房榜主表并逐行解析
    ///
    /// 找表顺序：先按 wikitable class，退化到任意 table；再挑表头
    /// 同时提到影片和票房的那张；都认不出来就用第一张。
    /// 一条影片都解析不出来视为页面结构变了，返回错误。
    pub fn extract_films(&self, html: &str) -> Result<Vec<ParsedFilm>> {
        let document = Html::parse_document(html);
        let wikitable_selector = Selector::parse("table.wikitable")
            .expect("Invalid table selector - this is a programming error");
        let any_table_selector = Selector::parse("table")
            .expect("Invalid table selector - this is a programming error");

        let mut tables: Vec<ElementRef> = document.select(&wikitable_selector).collect();
        if tables.is_empty() {
            tables = document.select(&any_table_selector).collect();
        }
        if tables.is_empty() {
            return Err(anyhow!("no tables found in the page"));
        }

        let table = tables
            .iter()
            .find(|t| is_film_table(t))
            .copied()
            .unwrap_or(tables[0]);

        let row_selector =
            Selector::parse("tr").expect("Invalid row selector - this is a programming error");
        let rows: Vec<ElementRef> = table.select(&row_selector).collect();
        let Some((header_row, body_rows)) = rows.split_first() else {
            return Err(anyhow!("film table has no rows"));
        };

        let columns = resolve_columns(header_row);
        tracing::debug!(
            "Using columns - title: {}, year: {:?}, box office: {}",
            columns.title,
            columns.year,
            columns.box_office
        );

        let cell_selector = Selector::parse("th, td")
            .expect("Invalid cell selector - this is a programming error");
        let mut films = Vec::new();
        for row in body_rows {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            if cells.len() <= columns.title.max(columns.box_office) {
                continue;
            }
            if let Some(film) = self.parse_row(&cells, columns) {
                films.push(film);
            }
        }

        if films.is_empty() {
            return Err(anyhow!("film table matched but no rows could be parsed"));
        }

        Ok(films)
    }

    fn parse_row(&self, cells: &[ElementRef], columns: ColumnMap) -> Option<ParsedFilm> {
        let title_cell = cells[columns.title];
        let link_selector =
            Selector::parse("a").expect("Invalid link selector - this is a programming error");

        let (raw_title, article_href) = match title_cell.select(&link_selector).next() {
            Some(link) => (
                element_text(&link),
                link.value().attr("href").map(str::to_string),
            ),
            None => (element_text(&title_cell), None),
        };

        let mut title = self
            .footnote_regex
            .replace_all(&raw_title, "")
            .trim()
            .to_string();

        let box_office = self.parse_gross(&element_text(&cells[columns.box_office]));

        let release_year = match columns.year {
            Some(year_idx) if year_idx < cells.len() => self
                .year_regex
                .captures(&element_text(&cells[year_idx]))
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i32>().ok()),
            _ => {
                // 没有年份列就从标题里找 "(1997)"，找到后从标题里去掉
                let year = self
                    .title_year_regex
                    .captures(&title)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse::<i32>().ok());
                if year.is_some() {
                    title = self.title_year_regex.replace_all(&title, "").trim().to_string();
                }
                year
            }
        };

        if title.is_empty() {
            return None;
        }

        Some(ParsedFilm {
            title,
            release_year,
            box_office,
            article_href,
        })
    }

    /// 清洗票房单元格文本并解析成数字，解析不动一律当 0
    fn parse_gross(&self, text: &str) -> f64 {
        let without_footnotes = self.footnote_regex.replace_all(text, "");
        let digits = self.money_regex.replace_all(&without_footnotes, "");
        let mut value: f64 = digits.parse().unwrap_or(0.0);

        // 清洗没摘干净的脚注数字会把金额放大几个量级，
        // 按十位数字收回到正常范围
        if value > 5_000_000_000.0 {
            let magnitude = format!("{}", value.trunc() as i64).len();
            if magnitude > 10 {
                value /= 10f64.powi((magnitude - 10) as i32);
            }
        }

        value
    }

    /// 从条目页信息框提取导演和国家
    ///
    /// 多位导演、多个国家只取第一个分隔符之前的值，引用标注去掉。
    /// 信息框缺失或没有对应行时字段保持未知，不算错误。
    pub fn extract_details(&self, html: &str) -> FilmDetails {
        let document = Html::parse_document(html);
        let infobox_selector = Selector::parse("table.infobox")
            .expect("Invalid infobox selector - this is a programming error");
        let row_selector =
            Selector::parse("tr").expect("Invalid row selector - this is a programming error");
        let label_selector =
            Selector::parse("th").expect("Invalid label selector - this is a programming error");
        let value_selector =
            Selector::parse("td").expect("Invalid value selector - this is a programming error");

        let mut details = FilmDetails::default();
        let Some(infobox) = document.select(&infobox_selector).next() else {
            return details;
        };

        for row in infobox.select(&row_selector) {
            let Some(label) = row.select(&label_selector).next() else {
                continue;
            };
            let Some(value) = row.select(&value_selector).next() else {
                continue;
            };

            let label_text = element_text(&label);
            if details.director.is_none()
                && (label_text.contains("Directed by") || label_text.contains("Director"))
            {
                details.director = self.first_value(&element_text(&value));
            } else if details.country.is_none()
                && (label_text.contains("Country") || label_text.contains("Countries"))
            {
                details.country = self.first_value(&element_text(&value));
            }

            if details.director.is_some() && details.country.is_some() {
                break;
            }
        }

        details
    }

    fn first_value(&self, text: &str) -> Option<String> {
        let without_citations = self.footnote_regex.replace_all(text, "");
        let first = self
            .separator_regex
            .splitn(&without_citations, 2)
            .next()
            .unwrap_or("");
        let cleaned = first.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }
}

/// 表头是否同时提到影片和票房
fn is_film_table(table: &ElementRef) -> bool {
    let header_selector =
        Selector::parse("th").expect("Invalid header selector - this is a programming error");
    let headers: Vec<String> = table
        .select(&header_selector)
        .map(|th| element_text(&th).to_lowercase())
        .collect();

    let has_title = headers.iter().any(|h| h.contains("title") || h.contains("film"));
    let has_gross = headers
        .iter()
        .any(|h| h.contains("box office") || h.contains("gross") || h.contains("worldwide"));

    has_title && has_gross
}

/// 按表头文本定位列，带和页面版式演化相称的回退
fn resolve_columns(header_row: &ElementRef) -> ColumnMap {
    let header_selector =
        Selector::parse("th").expect("Invalid header selector - this is a programming error");
    let headers: Vec<String> = header_row
        .select(&header_selector)
        .map(|th| element_text(&th).to_lowercase())
        .collect();

    let title = headers
        .iter()
        .position(|h| h.contains("title") || h.contains("film"))
        .unwrap_or(if headers.len() > 1 { 1 } else { 0 });

    let year = headers
        .iter()
        .position(|h| h.contains("year") || h.contains("released") || h.contains("release"));

    let box_office = headers
        .iter()
        .position(|h| h.contains("box office") || h.contains("gross") || h.contains("worldwide"))
        .or_else(|| {
            headers
                .iter()
                .position(|h| h.contains('$') || h.contains('¥') || h.contains('€'))
        })
        .unwrap_or(if headers.len() > 2 {
            2
        } else {
            headers.len().saturating_sub(1)
        });

    ColumnMap {
        title,
        year,
        box_office,
    }
}

/// 元素文本，空白折叠成单个空格
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_PAGE: &str = r#"
        <html><body>
        <table class="wikitable">
          <tr><th>Actor</th><th>Role</th></tr>
          <tr><td>Someone</td><td>Lead</td></tr>
        </table>
        <table class="wikitable">
          <tr><th>Rank</th><th>Title</th><th>Worldwide gross</th><th>Year</th></tr>
          <tr><th>1</th><td><a href="/wiki/Avatar_(2009_film)">Avatar</a></td>
              <td>$2,923,706,026<sup>[1]</sup></td><td>2009</td></tr>
          <tr><th>2</th><td><a href="/wiki/Titanic_(1997_film)">Titanic</a></td>
              <td>$2,264,750,694</td><td>1997</td></tr>
          <tr><th>3</th><td>Unlinked Film</td><td>TBD</td><td>2030</td></tr>
          <tr><th>4</th><td></td><td>$1</td><td>2000</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_extract_films_from_second_table() {
        let parser = WikiFilmParser::new();
        let films = parser.extract_films(LIST_PAGE).unwrap();

        assert_eq!(films.len(), 3);
        assert_eq!(films[0].title, "Avatar");
        assert_eq!(films[0].release_year, Some(2009));
        assert_eq!(films[0].box_office, 2_923_706_026.0);
        assert_eq!(films[0].article_href.as_deref(), Some("/wiki/Avatar_(2009_film)"));
    }

    #[test]
    fn test_unparsable_gross_becomes_zero() {
        let parser = WikiFilmParser::new();
        let films = parser.extract_films(LIST_PAGE).unwrap();

        assert_eq!(films[2].title, "Unlinked Film");
        assert_eq!(films[2].box_office, 0.0);
        assert!(films[2].article_href.is_none());
    }

    #[test]
    fn test_magnitude_fix_for_unstripped_footnote_digits() {
        let parser = WikiFilmParser::new();
        // 11 位数字说明金额里混进了脚注
        assert_eq!(parser.parse_gross("$29,237,060,261"), 2_923_706_026.1);
        // 合法的大票房不动
        assert_eq!(parser.parse_gross("$2,923,706,026"), 2_923_706_026.0);
        assert_eq!(parser.parse_gross("n/a"), 0.0);
    }

    #[test]
    fn test_year_extracted_from_title_when_no_year_column() {
        let html = r#"
            <table class="wikitable">
              <tr><th>Rank</th><th>Film</th><th>Box office</th></tr>
              <tr><th>1</th><td>Titanic (1997)</td><td>$2,264,750,694</td></tr>
            </table>
        "#;
        let parser = WikiFilmParser::new();
        let films = parser.extract_films(html).unwrap();

        assert_eq!(films[0].title, "Titanic");
        assert_eq!(films[0].release_year, Some(1997));
    }

    #[test]
    fn test_no_film_table_is_an_error() {
        let parser = WikiFilmParser::new();
        assert!(parser.extract_films("<html><body><p>nothing</p></body></html>").is_err());

        let html = r#"
            <table class="wikitable">
              <tr><th>Rank</th><th>Title</th><th>Worldwide gross</th></tr>
            </table>
        "#;
        // 表找到了但没有数据行
        assert!(parser.extract_films(html).is_err());
    }

    #[test]
    fn test_extract_details_takes_first_values() {
        let html = r#"
            <table class="infobox">
              <tr><th>Directed by</th><td>Anthony Russo<sup>[2]</sup> and Joe Russo</td></tr>
              <tr><th>Country</th><td>United States, United Kingdom</td></tr>
            </table>
        "#;
        let parser = WikiFilmParser::new();
        let details = parser.extract_details(html);

        assert_eq!(details.director.as_deref(), Some("Anthony Russo"));
        assert_eq!(details.country.as_deref(), Some("United States"));
    }

    #[test]
    fn test_extract_details_without_infobox() {
        let parser = WikiFilmParser::new();
        let details = parser.extract_details("<html><body></body></html>");
        assert!(details.director.is_none());
        assert!(details.country.is_none());
    }
}
