use crate::{
    models::{Student, StudentForm, StudentSummary},
    state::AppState,
    utils::AppError,
};

pub async fn register_student(state: &AppState, form: StudentForm) -> Result<(), AppError> {
    let has_photo = form.image.is_some();
    let student = Student::new(form);

    state.students.insert_student(&student).await?;

    log::info!(
        "✅ Student registered: {} (photo: {})",
        student.name.as_deref().unwrap_or("<unnamed>"),
        has_photo
    );
    Ok(())
}

pub async fn list_students(state: &AppState) -> Result<Vec<StudentSummary>, AppError> {
    let students = state.students.list_students().await?;
    Ok(students.into_iter().map(StudentSummary::from).collect())
}

pub async fn delete_student(state: &AppState, name: Option<String>) -> Result<(), AppError> {
    let name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::bad_request("Name required"))?;

    if !state.students.delete_student(&name).await? {
        return Err(AppError::NotFound(format!("Student {} not found", name)));
    }
    Ok(())
}
