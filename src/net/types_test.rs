use super::*;

#[test]
fn login_response_without_refresh_token() {
    let body = r#"{"access_token":"a.b.c","user":{"first_name":"Анна"}}"#;
    let resp: LoginResponse = serde_json::from_str(body).unwrap();
    assert_eq!(resp.access_token, "a.b.c");
    assert_eq!(resp.user.first_name.as_deref(), Some("Анна"));
    assert!(resp.refresh_token.is_none());
}

#[test]
fn login_response_with_body_refresh_token() {
    let body = r#"{"access_token":"a.b.c","user":{"first_name":"Анна"},"refresh_token":"r.s.t"}"#;
    let resp: LoginResponse = serde_json::from_str(body).unwrap();
    assert_eq!(resp.refresh_token.as_deref(), Some("r.s.t"));
}

#[test]
fn cached_user_keeps_unknown_fields() {
    let user: CachedUser = serde_json::from_str(r#"{"first_name":"Иван","last_name":"Петров"}"#).unwrap();
    assert_eq!(user.extra.get("last_name").and_then(Value::as_str), Some("Петров"));

    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["last_name"], "Петров");
    assert!(json.get("role").is_none());
}

#[test]
fn defect_accepts_both_casings() {
    let snake: Defect = serde_json::from_str(
        r#"{"id":1,"title":"t","priority":"high","status":"new","project_id":3,"created_at":"x"}"#,
    )
    .unwrap();
    let camel: Defect = serde_json::from_str(
        r#"{"id":1,"title":"t","priority":"high","status":"new","projectId":3,"createdAt":"x"}"#,
    )
    .unwrap();
    assert_eq!(snake.project_id, Some(3));
    assert_eq!(camel.project_id, Some(3));
    assert_eq!(camel.created_at.as_deref(), Some("x"));
}

#[test]
fn new_defect_serializes_project_id_in_camel_case() {
    let draft = NewDefect {
        title: "Трещина".into(),
        description: "Трещина в перекрытии".into(),
        priority: "high".into(),
        project_id: 2,
    };
    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["projectId"], 2);
}

#[test]
fn report_defaults_missing_attachments() {
    let report: Report = serde_json::from_str(r#"{"id":5,"title":"Отчёт","status":"pending"}"#).unwrap();
    assert!(report.attachments.is_empty());
    assert!(report.defect.is_none());
}

#[test]
fn report_reads_null_attachments_as_empty() {
    let reports: Vec<Report> = serde_json::from_str(
        r#"[{"id":3,"title":"Отчёт","description":"ok","attachments":null,"status":"pending"},
            {"id":4,"title":"Фото","attachments":["uploads/4.jpg"],"status":"pending"}]"#,
    )
    .unwrap();
    assert!(reports[0].attachments.is_empty());
    assert_eq!(reports[1].attachments, ["uploads/4.jpg"]);
}

#[test]
fn review_decision_wire_values() {
    assert_eq!(serde_json::to_value(ReviewDecision::Approve).unwrap(), "approve");
    assert_eq!(serde_json::to_value(ReviewDecision::Reject).unwrap(), "reject");
}

#[test]
fn admin_user_ignores_password_and_tolerates_missing_role() {
    let listed: AdminUser = serde_json::from_str(
        r#"{"id":1,"email":"a@b.ru","password":"$2a$hash","first_name":"Анна","last_name":"Иванова","role_id":1,"role":{"id":1,"name":"Админ"}}"#,
    )
    .unwrap();
    assert_eq!(listed.role.as_ref().map(|r| r.name.as_str()), Some("Админ"));
    assert_eq!(listed.full_name(), "Иванова Анна");
    assert!(serde_json::to_value(&listed).unwrap().get("password").is_none());

    let manager: AdminUser = serde_json::from_str(r#"{"id":4,"first_name":"Олег","role_id":2,"role":null}"#).unwrap();
    assert!(manager.role.is_none());
    assert_eq!(manager.full_name(), "Олег");
}
