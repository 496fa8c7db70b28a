use sea_orm::DatabaseConnection;
use task_server::task::{TaskPayload, TaskService, TaskServiceError, TaskStatus};
use testcontainers_modules::{postgres, testcontainers};

mod common;

pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    Ok(TestContext { db, container })
}

fn payload(title: &str, status: TaskStatus) -> TaskPayload {
    TaskPayload {
        title: title.to_string(),
        description: None,
        status,
        due_date_time: None,
    }
}

#[tokio::test]
async fn can_create_task_with_store_assigned_fields() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let due = chrono::NaiveDate::from_ymd_opt(2026, 12, 31)
        .unwrap()
        .and_hms_opt(17, 0, 0)
        .unwrap();
    let created = task_service
        .create_task(TaskPayload {
            title: "Review case documents".to_string(),
            description: Some("Review all documents for case #12345".to_string()),
            status: TaskStatus::Todo,
            due_date_time: Some(due),
        })
        .await
        .expect("Failed to create task");

    assert!(created.id() > 0);
    assert_eq!(created.title(), "Review case documents");
    assert_eq!(
        created.description(),
        Some("Review all documents for case #12345")
    );
    assert_eq!(created.status(), TaskStatus::Todo);
    assert_eq!(created.due_date_time(), Some(due));
    assert_eq!(created.created_at(), created.updated_at());
}

#[tokio::test]
async fn can_get_task_by_id() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let created = task_service
        .create_task(payload("Prepare hearing bundle", TaskStatus::InProgress))
        .await
        .expect("Failed to create task");

    let fetched = task_service
        .get_task_by_id(created.id())
        .await
        .expect("Failed to get task");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn can_handle_get_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let result = task_service.get_task_by_id(999).await;
    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
    if let Err(e) = result {
        assert_eq!(e.to_string(), "Task not found with id: 999");
    }
}

#[tokio::test]
async fn can_list_tasks_in_creation_order() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    for title in ["Task A", "Task B", "Task C"] {
        task_service
            .create_task(payload(title, TaskStatus::Todo))
            .await
            .expect("Failed to create task");
    }

    let tasks = task_service
        .get_all_tasks()
        .await
        .expect("Failed to list tasks");
    let titles: Vec<&str> = tasks.iter().map(|task| task.title()).collect();
    assert_eq!(titles, vec!["Task A", "Task B", "Task C"]);
}

#[tokio::test]
async fn can_list_nothing_from_an_empty_store() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let tasks = task_service
        .get_all_tasks()
        .await
        .expect("Failed to list tasks");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn can_update_status_without_touching_other_fields() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let due = chrono::NaiveDate::from_ymd_opt(2026, 9, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let created = task_service
        .create_task(TaskPayload {
            title: "Draft judgment".to_string(),
            description: Some("First draft".to_string()),
            status: TaskStatus::Todo,
            due_date_time: Some(due),
        })
        .await
        .expect("Failed to create task");

    let updated = task_service
        .update_task_status(created.id(), TaskStatus::Completed)
        .await
        .expect("Failed to update task status");

    assert_eq!(updated.status(), TaskStatus::Completed);
    assert_eq!(updated.title(), created.title());
    assert_eq!(updated.description(), created.description());
    assert_eq!(updated.due_date_time(), created.due_date_time());
    assert_eq!(updated.created_at(), created.created_at());
    assert!(updated.updated_at() > created.updated_at());
}

#[tokio::test]
async fn can_handle_status_update_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let result = task_service
        .update_task_status(999, TaskStatus::Cancelled)
        .await;
    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
}

#[tokio::test]
async fn can_overwrite_all_task_fields() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let created = task_service
        .create_task(payload("Initial title", TaskStatus::Todo))
        .await
        .expect("Failed to create task");

    let due = chrono::NaiveDate::from_ymd_opt(2027, 1, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let updated = task_service
        .update_task(
            created.id(),
            TaskPayload {
                title: "Updated title".to_string(),
                description: Some("Now with a description".to_string()),
                status: TaskStatus::InProgress,
                due_date_time: Some(due),
            },
        )
        .await
        .expect("Failed to update task");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.title(), "Updated title");
    assert_eq!(updated.description(), Some("Now with a description"));
    assert_eq!(updated.status(), TaskStatus::InProgress);
    assert_eq!(updated.due_date_time(), Some(due));
    assert_eq!(updated.created_at(), created.created_at());
    assert!(updated.updated_at() > created.updated_at());
}

#[tokio::test]
async fn can_handle_update_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let result = task_service
        .update_task(999, payload("Does not exist", TaskStatus::Todo))
        .await;
    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
}

#[tokio::test]
async fn can_delete_task() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let created = task_service
        .create_task(payload("Short-lived task", TaskStatus::Todo))
        .await
        .expect("Failed to create task");

    let deleted = task_service
        .delete_task_by_id(created.id())
        .await
        .expect("Failed to delete task");
    assert_eq!(deleted, created);

    let result = task_service.get_task_by_id(created.id()).await;
    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(_))));
}

#[tokio::test]
async fn can_handle_delete_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let task_service = TaskService::new(&state.db);

    let result = task_service.delete_task_by_id(999).await;
    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(999))));
}
