use classbook_core::api::HttpApi;
use classbook_core::config::ApiConfig;
use classbook_core::engine::RecordsEngine;
use classbook_core::error::ClassbookError;
use classbook_core::models::common::{Collection, GradeKind};
use classbook_core::views::Average;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_collection(server: &MockServer, name: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_fixture(server: &MockServer) {
    mount_collection(
        server,
        "courses",
        json!([
            {"id": 1, "name": "Mathematics"},
            {"id": 2, "name": "History"},
            {"id": 3, "name": "Biology", "description": "Cells and genetics"}
        ]),
    )
    .await;
    mount_collection(
        server,
        "classes",
        json!([
            {"id": 1, "name": "MAT-2025A", "course_id": 1},
            {"id": 2, "name": "HIS-2025A", "course_id": 2}
        ]),
    )
    .await;
    mount_collection(
        server,
        "students",
        json!([
            {"id": 1, "name": "Ana", "email": "ana@example.com"},
            {"id": 2, "name": "Bruno", "email": "bruno@example.com"},
            {"id": 3, "name": "Carla", "email": "carla@example.com"},
            {"id": 4, "name": "Diego", "email": "diego@example.com"},
            {"id": 5, "name": "Elisa", "email": "elisa@example.com"}
        ]),
    )
    .await;
    mount_collection(
        server,
        "enrollments",
        json!([
            {"id": 1, "student_id": 1, "class_id": 1},
            {"id": 2, "student_id": 2, "class_id": 1},
            {"id": 3, "student_id": 3, "class_id": 2},
            {"id": 4, "student_id": 4, "class_id": 2},
            {"id": 5, "student_id": 5, "class_id": 2}
        ]),
    )
    .await;
    mount_collection(
        server,
        "grades",
        json!([
            {"id": 1, "enrollment_id": 1, "kind": "exam", "value": 8.0},
            {"id": 2, "enrollment_id": 1, "kind": "work", "value": 6.0},
            {"id": 3, "enrollment_id": 3, "kind": "exam", "value": 9.5},
            {"id": 4, "enrollment_id": 4, "kind": "work", "value": 4.0}
        ]),
    )
    .await;
}

#[tokio::test]
async fn load_all_against_fixture_api() {
    let server = MockServer::start().await;
    mount_fixture(&server).await;

    let engine = RecordsEngine::new(HttpApi::new(&server.uri()));
    let loaded = engine.load_all().await.unwrap();

    assert_eq!(loaded.courses.len(), 3);
    assert_eq!(loaded.classes.len(), 2);
    assert_eq!(loaded.students.len(), 5);
    assert_eq!(loaded.enrollments.len(), 5);
    assert_eq!(loaded.grades.len(), 4);

    let in_history: Vec<String> = engine
        .students_in_class(2)
        .await
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(in_history, vec!["Carla", "Diego", "Elisa"]);

    let labels = engine.classes_with_course_name().await;
    assert_eq!(labels[0].course_name, "Mathematics");
    assert_eq!(labels[1].course_name, "History");

    let roster = engine.class_roster(1).await;
    assert_eq!(roster[0].average, Average::Value(7.0));
    assert_eq!(roster[1].average, Average::NoGrade);
}

#[tokio::test]
async fn load_all_fails_when_any_collection_fails() {
    let server = MockServer::start().await;
    mount_collection(&server, "courses", json!([{"id": 1, "name": "Mathematics"}])).await;
    mount_collection(&server, "classes", json!([])).await;
    mount_collection(&server, "students", json!([])).await;
    mount_collection(&server, "enrollments", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/grades"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = RecordsEngine::new(HttpApi::new(&server.uri()));
    let err = engine.load_all().await.unwrap_err();
    assert!(matches!(
        err,
        ClassbookError::Fetch {
            collection: Collection::Grades,
            ..
        }
    ));
    assert_eq!(engine.counts().await.courses, 0);
}

#[tokio::test]
async fn upsert_grade_posts_when_missing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/grades"))
        .and(query_param("enrollment_id", "2"))
        .and(query_param("kind", "work"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/grades"))
        .and(body_json(json!({"enrollment_id": 2, "kind": "work", "value": 7.5})))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"id": 11, "enrollment_id": 2, "kind": "work", "value": 7.5}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    mount_collection(
        &server,
        "grades",
        json!([{"id": 11, "enrollment_id": 2, "kind": "work", "value": 7.5}]),
    )
    .await;

    let engine = RecordsEngine::new(HttpApi::new(&server.uri()));
    let grade = engine.upsert_grade(2, GradeKind::Work, 7.5).await.unwrap();
    assert_eq!(grade.id, 11);
    assert_eq!(engine.grades_for(2).await.work, Some(7.5));
}

#[tokio::test]
async fn upsert_grade_puts_full_body_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/grades"))
        .and(query_param("enrollment_id", "1"))
        .and(query_param("kind", "exam"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "enrollment_id": 1, "kind": "exam", "value": 8.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/grades/1"))
        .and(body_json(json!({"enrollment_id": 1, "kind": "exam", "value": 9.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 1, "enrollment_id": 1, "kind": "exam", "value": 9.0}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/grades"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    mount_collection(
        &server,
        "grades",
        json!([{"id": 1, "enrollment_id": 1, "kind": "exam", "value": 9.0}]),
    )
    .await;

    let engine = RecordsEngine::new(HttpApi::new(&server.uri()));
    let grade = engine.upsert_grade(1, GradeKind::Exam, 9.0).await.unwrap();
    assert_eq!(grade.value, 9.0);
    assert_eq!(engine.grades_for(1).await.exam, Some(9.0));
}

#[tokio::test]
async fn upsert_grade_out_of_range_never_reaches_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let engine = RecordsEngine::new(HttpApi::new(&server.uri()));
    let err = engine
        .upsert_grade(1, GradeKind::Exam, 10.5)
        .await
        .unwrap_err();
    assert!(matches!(err, ClassbookError::Validation(_)));
}

#[tokio::test]
async fn legacy_surface_upsert_updates_existing_grade() {
    let server = MockServer::start().await;

    for (name, body) in [
        ("cursos", json!([{"id": 1, "nome": "Matemática"}])),
        ("turmas", json!([{"id": 1, "nome": "Turma A", "curso_id": 1}])),
        (
            "estudantes",
            json!([{"id": 1, "nome": "Ana", "email": "ana@example.com", "curso_id": 1}]),
        ),
        (
            "matriculas",
            json!([{"id": 4, "estudante_id": 1, "turma_id": 1}]),
        ),
    ] {
        mount_collection(&server, name, body).await;
    }

    Mock::given(method("GET"))
        .and(path("/notas"))
        .and(query_param("matricula_id", "4"))
        .and(query_param("tipo", "prova"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "matricula_id": 4, "tipo": "prova", "valor": 5.0}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/notas/7"))
        .and(body_json(json!({"matricula_id": 4, "tipo": "prova", "valor": 9.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 7, "matricula_id": 4, "tipo": "prova", "valor": 9.0}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/notas"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    mount_collection(
        &server,
        "notas",
        json!([
            {"id": 7, "matricula_id": 4, "tipo": "prova", "valor": 9.0},
            {"id": 8, "matricula_id": 4, "tipo": "trabalho", "valor": 6.0}
        ]),
    )
    .await;

    let engine = RecordsEngine::new(HttpApi::from_config(&ApiConfig::legacy(&server.uri())));
    engine.load_all().await.unwrap();
    assert_eq!(engine.students_in_class(1).await[0].name, "Ana");

    let grade = engine.upsert_grade(4, GradeKind::Exam, 9.0).await.unwrap();
    assert_eq!(grade.id, 7);

    let roster = engine.class_roster(1).await;
    assert_eq!(roster[0].enrollment_id, 4);
    assert_eq!(roster[0].grades.exam, Some(9.0));
    assert_eq!(roster[0].average, Average::Value(7.5));
}

#[tokio::test]
async fn legacy_surface_upsert_posts_legacy_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notas"))
        .and(query_param("matricula_id", "2"))
        .and(query_param("tipo", "trabalho"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/notas"))
        .and(body_json(json!({"matricula_id": 2, "tipo": "trabalho", "valor": 8.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"id": 3, "matricula_id": 2, "tipo": "trabalho", "valor": 8.0}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    mount_collection(
        &server,
        "notas",
        json!([{"id": 3, "matricula_id": 2, "tipo": "trabalho", "valor": 8.0}]),
    )
    .await;

    let engine = RecordsEngine::new(HttpApi::from_config(&ApiConfig::legacy(&server.uri())));
    let grade = engine.upsert_grade(2, GradeKind::Work, 8.0).await.unwrap();
    assert_eq!(grade.id, 3);
    assert_eq!(engine.grades_for(2).await.work, Some(8.0));
}
