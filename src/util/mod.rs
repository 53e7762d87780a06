use crate::models::NoteUpload;

pub(crate) fn current_year() -> u32 {
    // Browser local time.
    js_sys::Date::new_0().get_full_year()
}

/// Date part of a backend timestamp (`2024-03-09T10:15:00` -> `2024-03-09`).
pub(crate) fn upload_date_label(created_at: Option<&str>) -> String {
    let Some(ts) = created_at.map(str::trim).filter(|s| !s.is_empty()) else {
        return "unknown date".to_string();
    };
    ts.split(['T', ' ']).next().unwrap_or(ts).to_string()
}

/// Read a picked file into an upload body.
pub(crate) async fn read_upload(
    file: web_sys::File,
    title: String,
    folder_id: String,
) -> Result<NoteUpload, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("failed to read file: {e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    Ok(NoteUpload {
        title,
        folder_id,
        file_name: file.name(),
        mime_type: Some(file.type_()).filter(|t| !t.is_empty()),
        bytes,
    })
}
