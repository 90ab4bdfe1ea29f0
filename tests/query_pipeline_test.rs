// 查询管线集成测试
//
// 在一份固定的影片数据上走完 筛选 -> 排序 -> 分页 -> DTO 的完整链路，
// 以及图表的缩放与回退逻辑

use film_explorer_backend::dataset::loader;
use film_explorer_backend::engine;
use film_explorer_backend::models::{FilmCardResponse, FilmQuery, FilmRecord, SortKey};

fn film(
    title: &str,
    year: Option<i32>,
    director: Option<&str>,
    box_office: f64,
    country: Option<&str>,
) -> FilmRecord {
    FilmRecord {
        id: None,
        title: title.to_string(),
        release_year: year,
        director: director.map(|d| d.to_string()),
        box_office,
        country: country.map(|c| c.to_string()),
    }
}

fn fixture() -> Vec<FilmRecord> {
    vec![
        film("Avatar", Some(2009), Some("James Cameron"), 2_923_706_026.0, Some("United States")),
        film("Avengers: Endgame", Some(2019), Some("Anthony Russo"), 2_797_501_328.0, Some("United States")),
        film("Avatar: The Way of Water", Some(2022), Some("James Cameron"), 2_320_250_281.0, Some("United States")),
        film("Titanic", Some(1997), Some("James Cameron"), 2_264_750_694.0, Some("United States")),
        film("Ne Zha 2", Some(2025), Some("Jiaozi"), 2_217_080_000.0, Some("China")),
        film("Star Wars: The Force Awakens", Some(2015), Some("J. J. Abrams"), 2_071_310_218.0, Some("United States")),
        film("Spirited Away", Some(2001), Some("Hayao Miyazaki"), 395_580_000.0, Some("Japan")),
        film("The Mystery Reel", None, None, 12_345.0, None),
    ]
}

#[test]
fn test_search_matches_title_or_director_case_insensitively() {
    let films = fixture();

    let by_title = FilmQuery::new(Some("AVATAR".to_string()), None, None, None);
    let matches = engine::apply(&films, &by_title);
    assert_eq!(matches.len(), 2);
    // 未排序时保持输入顺序
    assert_eq!(matches[0].title, "Avatar");
    assert_eq!(matches[1].title, "Avatar: The Way of Water");

    let by_director = FilmQuery::new(Some("cameron".to_string()), None, None, None);
    assert_eq!(engine::apply(&films, &by_director).len(), 3);
}

#[test]
fn test_filters_combine_with_and() {
    let films = fixture();

    let query = FilmQuery::new(
        Some("star".to_string()),
        Some(2015),
        Some("United".to_string()),
        None,
    );
    let matches = engine::apply(&films, &query);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].title, "Star Wars: The Force Awakens");

    // 同样的搜索词换一个年份，交集为空
    let query = FilmQuery::new(Some("star".to_string()), Some(1997), None, None);
    assert!(engine::apply(&films, &query).is_empty());
}

#[test]
fn test_blank_search_term_is_ignored() {
    let films = fixture();
    let query = FilmQuery::new(Some("   ".to_string()), None, None, None);
    assert_eq!(engine::apply(&films, &query).len(), films.len());
}

#[test]
fn test_sort_by_box_office_defaults_to_descending() {
    let films = fixture();
    let sort = SortKey::from_params(Some("box_office"), None).unwrap();
    let query = FilmQuery::new(None, None, None, sort);

    let matches = engine::apply(&films, &query);
    assert_eq!(matches[0].title, "Avatar");
    assert_eq!(matches[1].title, "Avengers: Endgame");
    assert_eq!(matches.last().unwrap().title, "The Mystery Reel");
}

#[test]
fn test_sort_params_reject_unknown_fields() {
    assert!(SortKey::from_params(Some("rating"), None).is_err());
    assert!(SortKey::from_params(Some("title"), Some("sideways")).is_err());
    assert!(SortKey::from_params(None, Some("asc")).unwrap().is_none());
}

#[test]
fn test_pagination_clamps_out_of_range_pages() {
    let films = fixture();
    let all = engine::apply(&films, &FilmQuery::default());

    let slice = engine::paginate(&all, 3, 99);
    assert_eq!(slice.total, 8);
    assert_eq!(slice.total_pages, 3);
    // 越界页码收敛到最后一页
    assert_eq!(slice.page, 3);
    assert_eq!(slice.films.len(), 2);

    let slice = engine::paginate(&all, 3, 0);
    assert_eq!(slice.page, 1);
    assert_eq!(slice.films.len(), 3);
}

#[test]
fn test_empty_result_still_has_one_page() {
    let films = fixture();
    let query = FilmQuery::new(Some("zzz no such film".to_string()), None, None, None);
    let matches = engine::apply(&films, &query);

    let slice = engine::paginate(&matches, 12, 1);
    assert_eq!(slice.total, 0);
    assert_eq!(slice.total_pages, 1);
    assert!(slice.films.is_empty());
}

#[test]
fn test_chart_widths_are_relative_to_the_widest_bar() {
    let films = vec![
        film("Big", Some(2020), None, 2_000_000_000.0, None),
        film("Half", Some(2021), None, 1_000_000_000.0, None),
    ];
    let refs: Vec<&FilmRecord> = films.iter().collect();

    let bars = engine::scale(&refs, 10);
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].width_fraction, 1.0);
    assert_eq!(bars[1].width_fraction, 0.5);
    assert_eq!(bars[0].display_value, "$2.00 billion");
}

#[test]
fn test_chart_falls_back_to_overall_top_for_broad_filters() {
    use film_explorer_backend::engine::ChartScope;

    // 命中 0 条或超过阈值都回退到全量
    assert_eq!(engine::chart::choose_scope(0, 20), ChartScope::Overall);
    assert_eq!(engine::chart::choose_scope(21, 20), ChartScope::Overall);
    assert_eq!(engine::chart::choose_scope(20, 20), ChartScope::Filtered);

    let films = fixture();
    let refs: Vec<&FilmRecord> = films.iter().collect();
    let bars = engine::scale(&refs, 3);
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].film.title, "Avatar");
    // 条形按票房降序
    assert!(bars[1].film.box_office >= bars[2].film.box_office);
}

#[test]
fn test_film_card_labels_unknown_fields() {
    let films = fixture();
    let card = FilmCardResponse::from(&films[7]);

    assert_eq!(card.year_label, "Unknown");
    assert_eq!(card.director, "Unknown");
    assert_eq!(card.country, "Unknown");
    assert_eq!(card.box_office_label, "$12,345");

    let card = FilmCardResponse::from(&films[0]);
    assert_eq!(card.year_label, "2009");
    assert_eq!(card.box_office_label, "$2.92 billion");
}

#[test]
fn test_loader_normalizes_raw_records() {
    let json = br#"[
        {"id": 1, "title": "Avatar", "release_year": 2009, "director": "James Cameron",
         "box_office": 2923706026.0, "country": "United States"},
        {"id": 2, "title": "  ", "release_year": 2010, "box_office": 1.0},
        {"id": 3, "title": "No Details", "release_year": 0, "director": "Unknown",
         "box_office": null, "country": ""}
    ]"#;

    let films = loader::parse_records(json).unwrap();
    // 空标题的记录被丢弃
    assert_eq!(films.len(), 2);

    assert_eq!(films[0].title, "Avatar");
    assert_eq!(films[0].id, Some(1));

    // 年份 0、字面 Unknown、空串都归一成缺失
    assert_eq!(films[1].title, "No Details");
    assert!(films[1].release_year.is_none());
    assert!(films[1].director.is_none());
    assert!(films[1].country.is_none());
    assert_eq!(films[1].box_office, 0.0);
}
