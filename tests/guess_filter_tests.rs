use geotag_server::db::guess_repo::{build_list_sql, GuessFilter, ResultOrder};
use uuid::Uuid;

#[test]
fn flag_one_means_ascending_everything_else_descending() {
    assert_eq!(ResultOrder::from_flag(1), ResultOrder::Asc);
    assert_eq!(ResultOrder::from_flag(0), ResultOrder::Desc);
    assert_eq!(ResultOrder::from_flag(2), ResultOrder::Desc);
    assert_eq!(ResultOrder::from_flag(-1), ResultOrder::Desc);
}

#[test]
fn unfiltered_listing_orders_by_result_and_limits() {
    let filter = GuessFilter {
        limit: 10,
        location_id: None,
        guesser: None,
        order: ResultOrder::Asc,
    };
    let sql = build_list_sql(&filter);
    assert!(sql.contains("ORDER BY result ASC"));
    assert!(sql.ends_with("LIMIT $1"));
    assert!(!sql.contains("WHERE"));
}

#[test]
fn location_filter_binds_first() {
    let filter = GuessFilter {
        limit: 5,
        location_id: Some(Uuid::new_v4()),
        guesser: None,
        order: ResultOrder::Asc,
    };
    let sql = build_list_sql(&filter);
    assert!(sql.contains("WHERE location_id = $1"));
    assert!(sql.ends_with("LIMIT $2"));
}

#[test]
fn guesser_filter_composes_with_location_filter() {
    let filter = GuessFilter {
        limit: 5,
        location_id: Some(Uuid::new_v4()),
        guesser: Some("bob".into()),
        order: ResultOrder::Desc,
    };
    let sql = build_list_sql(&filter);
    assert!(sql.contains("WHERE location_id = $1"));
    assert!(sql.contains("AND guesser = $2"));
    assert!(sql.contains("ORDER BY result DESC"));
    assert!(sql.ends_with("LIMIT $3"));
}

#[test]
fn guesser_only_filter_starts_its_own_where_clause() {
    let filter = GuessFilter {
        limit: 3,
        location_id: None,
        guesser: Some("bob".into()),
        order: ResultOrder::Desc,
    };
    let sql = build_list_sql(&filter);
    assert!(sql.contains("WHERE guesser = $1"));
    assert!(sql.ends_with("LIMIT $2"));
}
