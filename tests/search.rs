use json_probe::{
    Found, MaxDepth, Occurrence, Search, SearchError, SearchOptions, TreeBuilder,
};
use serde_json::{json, Value};

fn user_doc() -> Value {
    json!({"user": {"email": "a@x.com", "profile": {"email": "b@x.com"}}})
}

fn catalog() -> Value {
    json!({
        "store": {
            "Name": "corner",
            "books": [
                {"title": "Dune", "price": 9.5, "tags": ["scifi"]},
                {"title": "Emma", "price": 4, "meta": {"title": "alt"}}
            ],
            "owner": {"name": "Ray", "address": {"city": "Oslo", "name": "home"}}
        },
        "name": "root-name",
        "empty": {},
        "nothing": null
    })
}

#[test]
fn finds_first_last_and_all_occurrences() {
    let search = Search::from_json(user_doc(), SearchOptions::new()).unwrap();

    let first = search.find_first("email").unwrap().unwrap();
    assert_eq!(first.value, json!("a@x.com"));
    assert_eq!(first.path, "user.email");
    assert_eq!(first.key, "email");

    let last = search.find("email", Occurrence::Last).unwrap();
    let Found::One(Some(last)) = last else { panic!("expected a single match") };
    assert_eq!(last.value, json!("b@x.com"));
    assert_eq!(last.path, "user.profile.email");

    assert_eq!(search.find_all("email").unwrap().len(), 2);
}

#[test]
fn missing_keys_are_absent_not_errors() {
    let search = Search::from_json(user_doc(), SearchOptions::new()).unwrap();
    assert_eq!(search.find("phone", Occurrence::First).unwrap(), Found::One(None));
    assert_eq!(search.find("phone", Occurrence::Last).unwrap(), Found::One(None));
    assert_eq!(search.find("phone", Occurrence::All).unwrap(), Found::All(Vec::new()));
}

#[test]
fn first_and_last_agree_with_all() {
    for case_sensitive in [true, false] {
        let search =
            Search::from_json(catalog(), SearchOptions::new().with_case_sensitive(case_sensitive)).unwrap();
        for key in ["name", "title", "NAME", "price", "missing", "0"] {
            let all = search.find_all(key).unwrap();
            assert_eq!(search.find_first(key).unwrap(), all.first().cloned(), "key {key}");
            assert_eq!(search.find_last(key).unwrap(), all.last().cloned(), "key {key}");
        }
    }
}

#[test]
fn key_search_matches_equivalent_predicate() {
    for case_sensitive in [true, false] {
        let options = SearchOptions::new().with_case_sensitive(case_sensitive);
        let search = Search::from_json(catalog(), options).unwrap();
        for key in ["name", "Name", "title", "tags", "0"] {
            let by_key = search.find_all(key).unwrap();
            let by_predicate = search.find_where(|_, k, _| {
                if case_sensitive { k == key } else { k.to_lowercase() == key.to_lowercase() }
            });
            assert_eq!(by_key, by_predicate, "key {key}, case sensitive {case_sensitive}");
        }
    }
}

#[test]
fn array_indices_are_keys_and_path_segments() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    let titles = search.find_all("title").unwrap();
    let paths: Vec<&str> = titles.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, ["store.books.0.title", "store.books.1.title", "store.books.1.meta.title"]);

    let second = search.find_last("1").unwrap().unwrap();
    assert_eq!(second.path, "store.books.1");
    assert_eq!(second.key, "1");
}

#[test]
fn depth_limit_bounds_every_search() {
    let none = Search::from_json(catalog(), SearchOptions::new().with_max_depth(0)).unwrap();
    assert!(none.find_all("name").unwrap().is_empty());
    assert!(none.find_all("store").unwrap().is_empty());
    assert!(none.find_where(|_, _, _| true).is_empty());

    let top = Search::from_json(catalog(), SearchOptions::new().with_max_depth(1)).unwrap();
    let names = top.find_all("name").unwrap();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].path, "name");
    let everything: Vec<String> = top.find_where(|_, _, _| true).into_iter().map(|m| m.key).collect();
    assert_eq!(everything, ["store", "name", "empty", "nothing"]);

    let two = Search::from_json(catalog(), SearchOptions::new().with_max_depth(2)).unwrap();
    assert!(two.find_all("Name").unwrap().len() == 1);
    assert!(two.find_all("title").unwrap().is_empty());

    // path lookups are not depth limited
    assert!(none.find_by_path("store.owner.address.city").unwrap().is_some());
}

#[test]
fn find_by_path_resolves_what_find_reports() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    for key in ["name", "title", "price", "tags", "city"] {
        for hit in search.find_all(key).unwrap() {
            let resolved = search.find_by_path(&hit.path).unwrap().expect("path from find resolves");
            assert_eq!(resolved.value, hit.value);
            assert_eq!(resolved.key, hit.key);
            assert_eq!(resolved.path, hit.path);
        }
    }
}

#[test]
fn find_by_path_matches_keys_containing_the_delimiter() {
    let search = Search::from_json(json!({"a": {"b.c": {"d": 1}}}), SearchOptions::new()).unwrap();
    let hit = search.find_by_path("a.b.c.d").unwrap().unwrap();
    assert_eq!(hit.value, json!(1));
    assert_eq!(hit.path, "a.b.c.d");
    assert_eq!(hit.key, "d");
}

#[test]
fn find_by_path_prefers_the_single_segment_over_an_inner_run() {
    let doc = json!({"a": {"b": {"c": {"d": "single"}}, "b.c": {"d": "inner"}}});
    let search = Search::from_json(doc, SearchOptions::new()).unwrap();
    let hit = search.find_by_path("a.b.c.d").unwrap().unwrap();
    assert_eq!(hit.value, json!("single"));
    assert_eq!(hit.path, "a.b.c.d");
}

#[test]
fn find_by_path_on_long_ambiguous_paths() {
    // every level is reachable through "a" and, two levels down, through "a.a"
    let levels = 80;
    let mut builder = TreeBuilder::new();
    let mut below = vec![builder.value(json!("bottom"))];
    for _ in 0..levels {
        let level = builder.object();
        builder.insert(level, "a", below[below.len() - 1]).unwrap();
        if below.len() > 1 {
            builder.insert(level, "a.a", below[below.len() - 2]).unwrap();
        }
        below.push(level);
    }
    let root = below[below.len() - 1];
    let search = Search::new(builder.build(root).unwrap(), SearchOptions::new()).unwrap();

    let all_a = vec!["a"; levels].join(".");
    assert!(search.find_by_path(&format!("{all_a}.missing")).unwrap().is_none());
    assert_eq!(search.find_by_path(&all_a).unwrap().unwrap().value, json!("bottom"));
}

#[test]
fn find_by_path_with_custom_delimiter() {
    let options = SearchOptions::new().with_path_delimiter("/");
    let search = Search::from_json(catalog(), options).unwrap();
    let hit = search.find_by_path("store/books/0/tags/0").unwrap().unwrap();
    assert_eq!(hit.value, json!("scifi"));
    assert_eq!(hit.key, "0");
    assert_eq!(search.find_all("city").unwrap()[0].path, "store/owner/address/city");
    assert!(search.find_by_path("store.Name").unwrap().is_none());
    assert!(matches!(search.find_by_path("//"), Err(SearchError::Path { .. })));
}

#[test]
fn find_by_path_not_found_cases() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    for path in ["store.books.2", "store.books.x", "name.length", "nothing.inner", "store.missing"] {
        assert!(search.find_by_path(path).unwrap().is_none(), "{path}");
    }
    let null_hit = search.find_by_path("nothing").unwrap().unwrap();
    assert!(null_hit.value.is_null());
}

#[test]
fn reserved_segments_resolve_to_absent() {
    let doc = json!({"__proto__": {"polluted": true}, "a": {"constructor": 1, "prototype": {"x": 2}}});
    let search = Search::from_json(doc, SearchOptions::new()).unwrap();
    assert!(search.find_by_path("__proto__").unwrap().is_none());
    assert!(search.find_by_path("__proto__.polluted").unwrap().is_none());
    assert!(search.find_by_path("a.constructor").unwrap().is_none());
    assert!(search.find_by_path("a.prototype.x").unwrap().is_none());
    // key search still sees the literal keys
    assert_eq!(search.find_all("constructor").unwrap().len(), 1);
}

#[test]
fn invalid_paths_and_keys_are_rejected() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    for path in ["", ".", ".."] {
        assert!(matches!(search.find_by_path(path), Err(SearchError::Path { .. })), "{path:?}");
    }
    assert!(matches!(search.find_first(""), Err(SearchError::Key { .. })));
    assert!(matches!(search.find_first("\t "), Err(SearchError::Key { .. })));
    assert!(matches!(
        search.find_with_mode("name", "every"),
        Err(SearchError::InvalidArgument(_))
    ));
    assert!(matches!(search.find_with_mode("name", "all"), Ok(Found::All(v)) if v.len() == 3));
}

#[test]
fn cache_hits_after_first_miss_until_cleared() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    let first = search.find_all("title").unwrap();
    for _ in 0..4 {
        assert_eq!(search.find_all("title").unwrap(), first);
    }
    let stats = search.statistics();
    assert_eq!((stats.cache_misses, stats.cache_hits), (1, 4));

    search.clear_cache();
    search.find_first("title").unwrap();
    let stats = search.statistics();
    assert_eq!((stats.cache_misses, stats.cache_hits), (2, 4));
}

#[test]
fn cache_is_keyed_by_the_raw_key() {
    let search = Search::from_json(catalog(), SearchOptions::new().with_case_sensitive(false)).unwrap();
    let lower = search.find_all("name").unwrap();
    let upper = search.find_all("NAME").unwrap();
    assert_eq!(lower, upper);
    assert_eq!(search.statistics().cache_misses, 2);
    assert_eq!(search.statistics().cache_hits, 0);
}

#[test]
fn disabling_caching_discards_entries() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    search.find_all("title").unwrap();
    search.set_caching(false);
    assert!(!search.is_caching());
    search.set_caching(true);
    search.find_all("title").unwrap();
    let stats = search.statistics();
    assert_eq!((stats.cache_misses, stats.cache_hits), (2, 0));
}

#[test]
fn path_and_predicate_searches_bypass_the_cache() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    search.find_by_path("store.Name").unwrap();
    search.find_by_path("store.Name").unwrap();
    search.find_where(|v, _, _| v.as_str() == Some("Oslo"));
    let stats = search.statistics();
    assert_eq!(stats.searches, 3);
    assert_eq!(stats.cache_hits + stats.cache_misses, 0);
}

#[test]
fn every_query_is_counted_and_timed() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    search.find_all("name").unwrap();
    search.find_first("name").unwrap();
    search.find_by_path("store.owner").unwrap();
    search.find_where(|_, _, _| false);
    let stats = search.statistics();
    assert_eq!(stats.searches, 4);
    assert!(stats.average_search_time >= 0.0);
    assert!(stats.average_search_time.is_finite());
}

#[test]
fn statistics_are_snapshots() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    let before = search.statistics();
    search.find_all("name").unwrap();
    assert_eq!(before.searches, 0);
    assert_eq!(search.statistics().searches, 1);
}

#[test]
fn predicates_see_values_keys_and_segments() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    let cheap = search.find_where(|value, key, path| {
        key == "price" && path.len() == 4 && value.as_f64().is_some_and(|p| p < 5.0)
    });
    assert_eq!(cheap.len(), 1);
    assert_eq!(cheap[0].path, "store.books.1.price");
    assert_eq!(cheap[0].value, json!(4));

    let containers = search.find_where(|value, _, _| value.is_container() && value.is_empty());
    let paths: Vec<&str> = containers.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, ["empty"]);
}

#[test]
fn predicate_errors_propagate_unchanged() {
    #[derive(Debug, PartialEq)]
    struct Boom(String);

    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    let mut calls = 0;
    let result = search.try_find_where(|_, key, _| {
        calls += 1;
        if key == "books" { Err(Boom(key.to_string())) } else { Ok(true) }
    });
    assert_eq!(result, Err(Boom("books".into())));
    assert_eq!(calls, 3);
    assert_eq!(search.statistics().searches, 1);
}

#[test]
fn falsy_values_are_still_matches() {
    let doc = json!({"a": 0, "b": false, "c": "", "d": null, "e": [], "f": {}});
    let search = Search::from_json(doc, SearchOptions::new()).unwrap();
    for key in ["a", "b", "c", "d", "e", "f"] {
        assert!(search.find_first(key).unwrap().is_some(), "{key}");
        assert!(search.find_by_path(key).unwrap().is_some(), "{key}");
    }
}

#[test]
fn unicode_and_special_keys() {
    let doc = json!({"ключ": {"名前": 1}, "with space": {"$weird-key!": 2}});
    let search = Search::from_json(doc, SearchOptions::new()).unwrap();
    assert_eq!(search.find_first("名前").unwrap().unwrap().path, "ключ.名前");
    assert_eq!(search.find_by_path("with space.$weird-key!").unwrap().unwrap().value, json!(2));
}

#[test]
fn cycles_are_rejected_at_construction() {
    let mut b = TreeBuilder::new();
    let root = b.object();
    let a = b.object();
    let list = b.array();
    let leaf = b.value(json!("leaf"));
    b.insert(root, "a", a).unwrap();
    b.insert(a, "list", list).unwrap();
    b.push(list, leaf).unwrap();
    b.push(list, root).unwrap();
    let tree = b.build(root).unwrap();

    let err = Search::new(tree, SearchOptions::new()).unwrap_err();
    assert_eq!(err, SearchError::CircularReference { path: "a.list.1".into() });
}

#[test]
fn self_referencing_array_is_a_cycle() {
    let mut b = TreeBuilder::new();
    let root = b.array();
    b.push(root, root).unwrap();
    let tree = b.build(root).unwrap();
    assert!(matches!(
        Search::new(tree, SearchOptions::new()),
        Err(SearchError::CircularReference { .. })
    ));
}

#[test]
fn aliased_subtrees_are_searchable() {
    let mut b = TreeBuilder::new();
    let root = b.object();
    let shared = b.value(json!({"id": 7}));
    let left = b.object();
    let right = b.array();
    b.insert(left, "node", shared).unwrap();
    b.push(right, shared).unwrap();
    b.insert(root, "left", left).unwrap();
    b.insert(root, "right", right).unwrap();
    let tree = b.build(root).unwrap();

    let search = Search::new(tree, SearchOptions::new()).unwrap();
    let ids = search.find_all("id").unwrap();
    let paths: Vec<&str> = ids.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(paths, ["left.node.id", "right.0.id"]);
    assert_eq!(ids[0].value.id(), ids[1].value.id());
    assert_eq!(search.root().to_json(), json!({"left": {"node": {"id": 7}}, "right": [{"id": 7}]}));
}

#[test]
fn undefined_entries_are_visited() {
    let mut b = TreeBuilder::new();
    let root = b.object();
    let gap = b.undefined();
    b.insert(root, "gap", gap).unwrap();
    let tree = b.build(root).unwrap();
    let search = Search::new(tree, SearchOptions::new()).unwrap();
    let hit = search.find_first("gap").unwrap().unwrap();
    assert!(hit.value.is_undefined());
    assert_eq!(serde_json::to_value(&hit).unwrap(), json!({"value": null, "path": "gap", "key": "gap"}));
}

#[test]
fn construction_validates_options_and_root() {
    let bad_delimiter = SearchOptions::new().with_path_delimiter("");
    assert!(matches!(Search::from_json(json!({}), bad_delimiter), Err(SearchError::Config(_))));
    assert!(matches!(Search::from_json(json!(null), SearchOptions::new()), Err(SearchError::Type(_))));

    let from_json = SearchOptions::from_json(&json!({"maxDepth": "nope"}));
    assert!(matches!(from_json, Err(SearchError::Config(_))));

    let options = SearchOptions::from_json(&json!({"caseSensitive": false, "maxDepth": 3, "pathDelimiter": "/", "caching": false})).unwrap();
    let search = Search::from_json(catalog(), options).unwrap();
    let config = search.config();
    assert!(!config.case_sensitive);
    assert_eq!(config.max_depth, MaxDepth::Limited(3));
    assert_eq!(config.path_delimiter, "/");
    assert!(!config.caching);
}

#[test]
fn matches_serialize_as_plain_json() {
    let search = Search::from_json(user_doc(), SearchOptions::new()).unwrap();
    let found = search.find("email", Occurrence::All).unwrap();
    assert_eq!(
        serde_json::to_value(&found).unwrap(),
        json!([
            {"value": "a@x.com", "path": "user.email", "key": "email"},
            {"value": "b@x.com", "path": "user.profile.email", "key": "email"}
        ])
    );
    let missing = search.find("nope", Occurrence::First).unwrap();
    assert_eq!(serde_json::to_value(&missing).unwrap(), Value::Null);
}

#[test]
fn search_can_be_shared_across_threads() {
    let search = Search::from_json(catalog(), SearchOptions::new()).unwrap();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(search.find_all("name").unwrap().len(), 3);
            });
        }
    });
    let stats = search.statistics();
    assert_eq!(stats.searches, 4);
    assert_eq!(stats.cache_hits + stats.cache_misses, 4);
}
