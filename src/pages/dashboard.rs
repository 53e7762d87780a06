use super::OPERATION_FAILED;
use crate::components::ui::{
    clear_file_input, selected_file, Button, ButtonSize, ButtonVariant, FileInput, Input, Modal,
    NoteGrid, Spinner, StatusMessage, StatusTone, TileGrid,
};
use crate::forms::{validate_folder_name, validate_upload};
use crate::guard::{allows, Affordance};
use crate::models::{Folder, Note};
use crate::search::{filter_by_query, SearchScope};
use crate::session::Role;
use crate::state::{accepts_notes, still_open, AppContext, FolderView, Preview};
use crate::util::{read_upload, upload_date_label};
use icons::{ArrowLeft, Download, Eye, FolderOpen, Plus, Trash2};
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local_scoped_with_cancellation;

type Status = Option<(StatusTone, String)>;

fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

fn failure(message: &str) -> Status {
    Some((StatusTone::Error, message.to_string()))
}

// Requests are spawned with cancellation tied to this page, and everything
// after an `.await` only writes signals or goes through the `try_*` guards:
// a handle read on a torn-down page would panic.
#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let ctx = StoredValue::new(app_state.0.clone());
    let search = app_state.0.search.clone();
    let auth = app_state.0.auth;
    let search_scope = app_state.0.search_scope;
    let folder_query = app_state.0.folder_query;
    let note_query = app_state.0.note_query;

    let folders: RwSignal<Vec<Folder>> = RwSignal::new(vec![]);
    let folder_status: RwSignal<Status> = RwSignal::new(None);
    let new_folder: RwSignal<String> = RwSignal::new(String::new());

    let folder_view: RwSignal<FolderView> = RwSignal::new(FolderView::default());
    let selected = Memo::new(move |_| folder_view.with(|v| v.open_folder().cloned()));

    let notes: RwSignal<Vec<Note>> = RwSignal::new(vec![]);
    let notes_loading: RwSignal<bool> = RwSignal::new(false);
    let note_status: RwSignal<Status> = RwSignal::new(None);

    let upload_title: RwSignal<String> = RwSignal::new(String::new());
    let upload_selected: RwSignal<bool> = RwSignal::new(false);
    let uploading: RwSignal<bool> = RwSignal::new(false);
    let file_ref: NodeRef<html::Input> = NodeRef::new();

    let can = move |a: Affordance| auth.with(|s| allows(s, a));
    let is_admin = move || auth.with(|s| s.has_role(&Role::Admin));

    let load_folders = move || {
        let Some(state) = ctx.try_get_value() else {
            return;
        };
        spawn_local_scoped_with_cancellation(async move {
            match state.api.list_folders().await {
                Ok(list) => folders.set(list),
                Err(e) => {
                    state.report_api_error("list folders", &e);
                    folder_status.set(failure(OPERATION_FAILED));
                }
            }
        });
    };

    let load_notes = move || {
        let Some(ticket) = folder_view.try_update(|v| v.begin_notes_request()).flatten() else {
            return;
        };
        let Some(state) = ctx.try_get_value() else {
            return;
        };
        notes_loading.set(true);

        spawn_local_scoped_with_cancellation(async move {
            let result = state.api.list_notes(ticket.folder_id()).await;
            if !accepts_notes(folder_view, &ticket) {
                return;
            }
            match result {
                Ok(list) => notes.set(list),
                Err(e) => {
                    state.report_api_error("list notes", &e);
                    note_status.set(failure(OPERATION_FAILED));
                }
            }
            notes_loading.set(false);
        });
    };

    load_folders();

    // Selection decides which list is shown and which query the navbar edits.
    Effect::new(move |_| {
        let current = selected.get();
        notes.set(vec![]);
        note_status.set(None);
        match current {
            Some(_) => {
                search_scope.set(SearchScope::Notes);
                load_notes();
            }
            None => {
                ctx.with_value(|s| s.search.scope(SearchScope::Notes).clear());
                search_scope.set(SearchScope::Folders);
            }
        }
    });

    on_cleanup(move || {
        search.scope(SearchScope::Notes).clear();
        search_scope.set(SearchScope::Folders);
    });

    let on_add_folder = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(req) = validate_folder_name(&new_folder.get_untracked()) else {
            return;
        };

        let state = ctx.get_value();
        spawn_local_scoped_with_cancellation(async move {
            match state.api.create_folder(&req).await {
                Ok(()) => {
                    new_folder.set(String::new());
                    folder_status.set(None);
                    load_folders();
                }
                Err(e) => {
                    state.report_api_error("create folder", &e);
                    folder_status.set(failure(OPERATION_FAILED));
                }
            }
        });
    };

    let delete_folder = move |folder: Folder| {
        if !confirm("Are you sure you want to delete this folder and all its notes?") {
            return;
        }

        let state = ctx.get_value();
        spawn_local_scoped_with_cancellation(async move {
            match state.api.delete_folder(&folder.id).await {
                Ok(()) => {
                    folder_view.try_update(|v| v.folder_deleted(&folder.id));
                    load_folders();
                }
                Err(e) => {
                    state.report_api_error("delete folder", &e);
                    folder_status.set(failure(OPERATION_FAILED));
                }
            }
        });
    };

    let on_upload = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if uploading.get_untracked() {
            return;
        }

        let title = upload_title.get_untracked();
        let folder_id = folder_view.with_untracked(|v| v.open_folder().map(|f| f.id.clone()));
        let file = selected_file(file_ref);

        if let Err(e) = validate_upload(&title, folder_id.as_deref(), file.is_some()) {
            note_status.set(Some((StatusTone::Error, e.to_string())));
            return;
        }
        let (Some(folder_id), Some(file)) = (folder_id, file) else {
            return;
        };

        uploading.set(true);
        note_status.set(None);

        let state = ctx.get_value();
        spawn_local_scoped_with_cancellation(async move {
            let result = match read_upload(file, title, folder_id.clone()).await {
                Ok(upload) => state.api.upload_note(upload).await.map_err(|e| {
                    state.report_api_error("upload note", &e);
                }),
                Err(reason) => {
                    log::warn!("upload note: {reason}");
                    Err(())
                }
            };
            uploading.set(false);

            // Status belongs to the folder it was raised in.
            if !still_open(folder_view, &folder_id) {
                return;
            }
            match result {
                Ok(()) => {
                    upload_title.set(String::new());
                    clear_file_input(file_ref, upload_selected);
                    note_status.set(Some((StatusTone::Success, "Note uploaded!".to_string())));
                    load_notes();
                }
                Err(()) => note_status.set(failure("Upload failed")),
            }
        });
    };

    let delete_note = move |note: Note| {
        if !confirm("Are you sure you want to delete this note?") {
            return;
        }

        let Some(folder_id) =
            folder_view.with_untracked(|v| v.open_folder().map(|f| f.id.clone()))
        else {
            return;
        };
        let state = ctx.get_value();
        spawn_local_scoped_with_cancellation(async move {
            let result = state.api.delete_note(&note.id).await;
            if result.is_ok() {
                folder_view.try_update(|v| v.note_deleted(&note.id));
            }
            if let Err(e) = &result {
                state.report_api_error("delete note", e);
            }

            if !still_open(folder_view, &folder_id) {
                return;
            }
            match result {
                Ok(()) => load_notes(),
                Err(_) => note_status.set(failure("Delete failed!")),
            }
        });
    };

    let folder_tiles = move || {
        let visible = folders.with(|all| filter_by_query(all, &folder_query.get()));
        let deletable = can(Affordance::DeleteFolder);

        visible
            .into_iter()
            .map(|folder| {
                let name = folder.name.clone();
                let on_open = folder.clone();
                let on_delete = folder.clone();
                view! {
                    <div
                        class="group relative flex cursor-pointer flex-col items-center justify-center rounded-2xl bg-white p-6 shadow transition hover:scale-[1.03] hover:shadow-lg"
                        on:click=move |_| folder_view.update(|v| v.open(on_open.clone()))
                    >
                        <FolderOpen class="mb-3 size-12 text-blue-500 transition group-hover:text-blue-700" />
                        <h2 class="w-full truncate text-center text-base font-semibold text-gray-800">{name}</h2>
                        {deletable.then(|| view! {
                            <button
                                type="button"
                                class="absolute right-3 top-3 text-red-500 opacity-0 transition hover:text-red-700 group-hover:opacity-100"
                                title="Delete folder"
                                on:click=move |ev: web_sys::MouseEvent| {
                                    ev.stop_propagation();
                                    delete_folder(on_delete.clone());
                                }
                            >
                                <Trash2 class="size-5" />
                            </button>
                        })}
                    </div>
                }
            })
            .collect_view()
    };

    let note_cards = move || {
        let visible = notes.with(|all| filter_by_query(all, &note_query.get()));
        let deletable = can(Affordance::DeleteNote);

        if visible.is_empty() {
            return view! {
                <p class="py-6 text-center text-gray-500">"No notes found in this folder."</p>
            }
            .into_any();
        }

        view! {
            <NoteGrid>
                {visible
                    .into_iter()
                    .map(|note| {
                        let uploaded = format!(
                            "Uploaded on {}",
                            upload_date_label(note.created_at.as_deref())
                        );
                        let to_preview = Preview::from(&note);
                        let download_url = note.file_url.clone();
                        let title = note.title.clone();
                        let on_delete = note.clone();
                        view! {
                            <div class="rounded-lg border bg-gray-50 p-4 shadow-sm transition hover:shadow-md">
                                <h3 class="mb-2 font-semibold text-gray-800">{title}</h3>
                                <p class="mb-3 text-xs text-gray-500">{uploaded}</p>
                                <div class="flex items-center justify-between text-sm">
                                    <button
                                        type="button"
                                        class="inline-flex items-center gap-1 text-blue-600 hover:text-blue-800"
                                        on:click=move |_| folder_view.update(|v| v.show_preview(to_preview.clone()))
                                    >
                                        <Eye class="size-4" />
                                        "Preview"
                                    </button>
                                    <a
                                        href=download_url
                                        download=""
                                        class="inline-flex items-center gap-1 text-green-600 hover:text-green-800"
                                    >
                                        <Download class="size-4" />
                                        "Download"
                                    </a>
                                    {deletable.then(|| view! {
                                        <button
                                            type="button"
                                            class="inline-flex items-center gap-1 text-red-600 hover:text-red-800"
                                            on:click=move |_| delete_note(on_delete.clone())
                                        >
                                            <Trash2 class="size-4" />
                                            "Delete"
                                        </button>
                                    })}
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </NoteGrid>
        }
        .into_any()
    };

    view! {
        <div class="min-h-screen bg-gradient-to-br from-gray-50 via-white to-blue-50 p-6">
            <Show
                when=move || selected.with(|s| s.is_some())
                fallback=move || view! {
                    <h1 class="mb-8 text-center text-4xl font-extrabold text-gray-800">
                        {move || if is_admin() { "Admin Panel" } else { "My Notes" }}
                    </h1>

                    <Show when=move || can(Affordance::CreateFolder) fallback=|| ().into_view()>
                        <div class="mb-8 flex justify-center">
                            <form class="flex gap-2" on:submit=on_add_folder>
                                <Input
                                    placeholder="Create new folder..."
                                    bind_value=new_folder
                                    class="w-64 rounded-xl"
                                />
                                <Button attr:title="Add folder">
                                    <Plus class="size-4" />
                                    "Add"
                                </Button>
                            </form>
                        </div>
                    </Show>

                    <div class="mb-4">
                        <StatusMessage message=folder_status />
                    </div>

                    <TileGrid>{folder_tiles}</TileGrid>
                }
            >
                <div class="mx-auto max-w-5xl rounded-xl bg-white p-6 shadow-lg">
                    <div class="mb-4 flex items-center justify-between">
                        <h2 class="text-2xl font-semibold text-gray-800">
                            {move || selected.with(|s| s.as_ref().map(|f| f.name.clone()).unwrap_or_default())}
                        </h2>
                        <Button
                            variant=ButtonVariant::Link
                            size=ButtonSize::Sm
                            on:click=move |_| folder_view.update(FolderView::close)
                        >
                            <ArrowLeft class="size-4" />
                            "Back to Folders"
                        </Button>
                    </div>

                    <Show when=move || can(Affordance::UploadNote) fallback=|| ().into_view()>
                        <form class="mb-6 flex flex-col gap-2 rounded-lg border bg-gray-50 p-4" on:submit=on_upload>
                            <Input placeholder="Note title" bind_value=upload_title />
                            <FileInput node_ref=file_ref selected=upload_selected />
                            <Button class="w-fit" attr:disabled=move || uploading.get() || !upload_selected.get()>
                                <Show when=move || uploading.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                "Upload"
                            </Button>
                        </form>
                    </Show>

                    <div class="mb-4">
                        <StatusMessage message=note_status />
                    </div>

                    <Show
                        when=move || !notes_loading.get()
                        fallback=|| view! {
                            <div class="flex justify-center py-6"><Spinner class="size-6" /></div>
                        }
                    >
                        {note_cards}
                    </Show>
                </div>
            </Show>

            <Modal
                open=Signal::derive(move || folder_view.with(|v| v.preview().is_some()))
                on_close=Callback::new(move |_| folder_view.update(FolderView::close_preview))
            >
                {move || folder_view.with(|v| v.preview().cloned()).map(|p| view! {
                    <iframe src=p.url title=p.title class="h-full w-full"></iframe>
                })}
            </Modal>
        </div>
    }
}
