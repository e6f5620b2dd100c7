//! Integration tests for study_rank

use study_rank::*;

/// Notes used by the worked example
const EXAMPLE_NOTES: &str = "merge sort uses recursion. sorting includes merge sort.";

/// A longer set of notes for end-to-end runs
const SAMPLE_NOTES: &str = r#"
Sorting is the first unit. Merge sort and quick sort are divide and conquer
algorithms. Merge sort uses recursion to split the array, and quick sort uses
recursion around a pivot. A heap supports heap sort. Binary search needs a
sorted array.

Graphs are traversed with breadth first search and depth first search. Depth
first search is naturally written with recursion. Dynamic programming caches
the results of recursion.
"#;

fn example_request() -> StudyRequest {
    StudyRequest::new(
        ["sorting", "merge sort", "recursion"],
        Vec::<String>::new(),
        EXAMPLE_NOTES,
    )
}

fn edge_list(graph: &AdjacencyGraph) -> Vec<(String, String)> {
    graph
        .edges()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn test_full_pipeline() {
    let request = StudyRequest::new(
        [
            "Sorting",
            "Merge Sort",
            "Quick Sort",
            "Recursion",
            "Heap",
            "Binary Search",
            "Graphs",
            "Dynamic Programming",
            "Tries",
        ],
        ["merge sort", "dynamic programming"],
        SAMPLE_NOTES,
    );
    let config = StudyRankConfig::default().with_context(ContextScope::Sentence);
    let plan = StudyPlanner::with_config(config).plan(&request).unwrap();

    assert!(plan.converged());
    assert_eq!(plan.curriculum.len(), 9);
    // "tries" never occurs, so it cannot be a graph node
    assert!(plan.graph.get_node_id("tries").is_none());
    assert_eq!(plan.study_order.len(), plan.graph.node_count());
    assert!((plan.study_order.total_score() - 1.0).abs() < 1e-6);

    // importance covers every curriculum topic, ranked or not
    assert_eq!(plan.importance.len(), 9);
    assert_eq!(plan.importance.score_of("tries"), Some(0.0));
    let merge = plan.importance.get("merge sort").unwrap();
    assert_eq!(merge.mentions, 2);
    assert_eq!(merge.exam_bonus, 10.0);

    // scores are non-increasing down the order
    let scores: Vec<f64> = plan.study_order.iter().map(|r| r.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_worked_example_sentence_scope() {
    let config = StudyRankConfig::default().with_context(ContextScope::Sentence);
    let plan = StudyPlanner::with_config(config)
        .plan(&example_request())
        .unwrap();

    assert_eq!(
        edge_list(&plan.graph),
        vec![
            ("sorting".to_string(), "merge sort".to_string()),
            ("merge sort".to_string(), "recursion".to_string()),
        ]
    );
    assert_eq!(plan.graph.out_degree(plan.graph.get_node_id("recursion").unwrap()), 0);

    let order: Vec<&str> = plan.study_order.iter().map(|r| r.topic.as_str()).collect();
    assert_eq!(order, vec!["recursion", "merge sort", "sorting"]);
    assert!((plan.study_order.score_of("recursion").unwrap() - 0.474412).abs() < 1e-6);
    assert!((plan.study_order.score_of("merge sort").unwrap() - 0.341172).abs() < 1e-6);
    assert!((plan.study_order.score_of("sorting").unwrap() - 0.184417).abs() < 1e-6);
    assert_eq!(plan.ranking.iterations, 18);
}

#[test]
fn test_worked_example_corpus_scope() {
    let plan = StudyPlanner::new().plan(&example_request()).unwrap();

    // every topic occurs, so every ordered pair of distinct topics is an edge
    assert_eq!(plan.graph.edge_count(), 6);
    for r in plan.study_order.iter() {
        assert!((r.score - 1.0 / 3.0).abs() < 1e-9);
    }
    // equal scores keep node enumeration order
    let order: Vec<&str> = plan.study_order.iter().map(|r| r.topic.as_str()).collect();
    assert_eq!(order, vec!["sorting", "merge sort", "recursion"]);
}

#[test]
fn test_empty_curriculum_end_to_end() {
    let request = StudyRequest::new(Vec::<String>::new(), ["heap"], "heap heap heap");
    let planner = StudyPlanner::new();
    let plan = planner.plan(&request).unwrap();

    assert!(plan.graph.is_empty());
    assert!(plan.importance.is_empty());
    assert!(plan.study_order.is_empty());

    let compact = ResultExporter::new().with_indent(0);
    assert_eq!(
        compact.to_json_string(&plan.document).unwrap(),
        r#"{"study_order":[]}"#
    );

    let pretty = planner.plan_to_json(&request).unwrap();
    let value: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(value, serde_json::json!({ "study_order": [] }));
}

#[test]
fn test_dangling_targets_share_rank() {
    let request = StudyRequest::new(["kmp", "heap", "trie"], Vec::<String>::new(), "kmp. trie.");
    // neither sentence mentions two topics, so there are no edges at all
    let config = StudyRankConfig::default().with_context(ContextScope::Sentence);
    let plan = StudyPlanner::with_config(config.clone()).plan(&request).unwrap();
    assert!(plan.study_order.is_empty());

    let request = StudyRequest::new(
        ["kmp", "heap", "trie"],
        Vec::<String>::new(),
        "kmp builds a heap. trie builds a heap.",
    );
    let plan = StudyPlanner::with_config(config).plan(&request).unwrap();
    let order: Vec<&str> = plan.study_order.iter().map(|r| r.topic.as_str()).collect();
    assert_eq!(order, vec!["heap", "kmp", "trie"]);
    assert!((plan.study_order.score_of("heap").unwrap() - 0.574469).abs() < 1e-6);
    assert_eq!(
        plan.study_order.score_of("kmp"),
        plan.study_order.score_of("trie")
    );
}

#[test]
fn test_metacharacter_topics() {
    let request = StudyRequest::new(
        ["c++", "c#", "a* search", "(graphs)"],
        ["c++"],
        "c++ and c# differ. a* search explores graphs.",
    );
    let plan = StudyPlanner::new().plan(&request).unwrap();

    assert!(plan.converged());
    // a trailing symbol has no word boundary after it, so "c++" never matches
    let cpp = plan.importance.get("c++").unwrap();
    assert_eq!(cpp.mentions, 0);
    assert_eq!(cpp.score, 10.0);
    assert_eq!(plan.importance.get("a* search").unwrap().mentions, 1);
    // absent topics still point at present ones, but nothing points at them
    assert!(plan.graph.contains_edge("c++", "a* search"));
    assert!(!plan.graph.contains_edge("a* search", "c++"));
}

#[test]
fn test_documents_are_split_and_normalized() {
    let request = StudyRequest::from_documents(
        "Unit 1 (Sorting), Merge Sort.\nRecursion",
        "Merge Sort, heap",
        EXAMPLE_NOTES,
    );
    let planner = StudyPlanner::new().with_validator(|c: &str| !c.starts_with("unit"));
    let plan = planner.plan(&request).unwrap();

    let curriculum: Vec<&str> = plan.curriculum.iter().map(|t| t.as_str()).collect();
    assert_eq!(curriculum, vec!["sorting", "merge sort", "recursion"]);
    assert!(plan.exam.contains("heap"));
    assert_eq!(plan.importance.get("merge sort").unwrap().exam_bonus, 10.0);
}

#[test]
fn test_importance_does_not_reorder_study_order() {
    let base = example_request();
    let mut boosted = base.clone();
    boosted.exam = vec!["sorting".to_string()];

    let planner = StudyPlanner::new();
    let a = planner.plan(&base).unwrap();
    let b = planner.plan(&boosted).unwrap();

    assert_eq!(a.study_order, b.study_order);
    assert!(b.importance.score_of("sorting").unwrap() > a.importance.score_of("sorting").unwrap());
}

#[test]
fn test_export_round_trip_through_file() {
    let plan = StudyPlanner::new().plan(&example_request()).unwrap();
    let exporter = ResultExporter::new();

    let mut buf = Vec::new();
    exporter.write_json(&plan.document, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();

    let parsed = StudyOrderDocument::from_json(&text).unwrap();
    assert_eq!(parsed, plan.document);
    assert_eq!(
        topics_from_json(&text).unwrap(),
        vec!["sorting", "merge sort", "recursion"]
    );
}

#[test]
fn test_config_from_json() {
    let config = StudyRankConfig::from_json(
        r#"{"damping": 0.9, "context": "sentence", "weights": {"exam_bonus": 20.0}}"#,
    )
    .unwrap();
    assert_eq!(config.damping, 0.9);
    assert_eq!(config.context, ContextScope::Sentence);
    assert_eq!(config.weights.exam_bonus, 20.0);
    assert_eq!(config.weights.mention, 1.5);

    assert!(StudyRankConfig::from_json(r#"{"damping": 1.5}"#).is_err());
    assert!(StudyRankConfig::from_json(r#"{"weights": {"mention": -1.0}}"#).is_err());
}

#[test]
fn test_too_many_topics() {
    let config = StudyRankConfig::default().with_max_topics(2);
    let err = StudyPlanner::with_config(config)
        .plan(&example_request())
        .unwrap_err();
    assert!(matches!(
        err,
        StudyRankError::TooManyTopics { count: 3, limit: 2 }
    ));
}

#[test]
fn test_iteration_cap_is_best_effort() {
    let config = StudyRankConfig::default()
        .with_max_iterations(2)
        .with_context(ContextScope::Sentence);
    let plan = StudyPlanner::with_config(config)
        .plan(&example_request())
        .unwrap();

    assert!(!plan.converged());
    assert_eq!(plan.ranking.iterations, 2);
    assert_eq!(plan.study_order.len(), 3);

    // callers that need convergence can escalate
    let err = plan.ranking.clone().require_converged().unwrap_err();
    assert!(err.is_convergence_failure());
}

#[test]
fn test_direct_ranking_rejects_bad_damping() {
    let plan = StudyPlanner::with_config(StudyRankConfig::default().with_context(ContextScope::Sentence))
        .plan(&example_request())
        .unwrap();

    let err = StandardPageRank::new()
        .with_damping(-0.5)
        .rank(&plan.graph)
        .unwrap_err();
    assert!(matches!(err, StudyRankError::InvalidConfig { .. }));

    let order = StandardPageRank::new().rank(&plan.graph).unwrap();
    assert_eq!(order, plan.study_order);
}

#[test]
fn test_top_n_selects_downstream_topics() {
    let config = StudyRankConfig::default()
        .with_context(ContextScope::Sentence)
        .with_top_n(2);
    let plan = StudyPlanner::with_config(config)
        .plan(&example_request())
        .unwrap();

    assert_eq!(plan.document.len(), 3);
    let downstream: Vec<&str> = plan.downstream_topics().iter().map(|t| t.as_str()).collect();
    assert_eq!(downstream, vec!["recursion", "merge sort"]);
}

#[test]
fn test_stage_observer_sees_every_stage() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut observer = StageTimingObserver::new();
    StudyPlanner::new()
        .plan_with_observer(&example_request(), &mut observer)
        .unwrap();

    let stages: Vec<&str> = observer.reports().iter().map(|(s, _)| *s).collect();
    assert_eq!(stages, vec!["normalize", "graph", "score", "rank", "export"]);
    let graph = observer.report("graph").unwrap();
    assert_eq!(graph.nodes(), Some(3));
    assert_eq!(graph.edges(), Some(6));
    assert_eq!(observer.report("rank").unwrap().converged(), Some(true));
}

#[test]
fn test_deterministic_across_runs() {
    let request = StudyRequest::new(
        ["sorting", "merge sort", "quick sort", "recursion", "heap"],
        ["heap"],
        SAMPLE_NOTES,
    );
    let planner = StudyPlanner::new();
    let first = planner.plan_to_json(&request).unwrap();
    for _ in 0..5 {
        assert_eq!(planner.plan_to_json(&request).unwrap(), first);
    }
}
