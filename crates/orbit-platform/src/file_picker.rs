//! Native file dialog and clipboard paste for image attachments.
//!
//! Both resolve asynchronously. Picked and pasted files land in a shared
//! queue that the app polls once per frame, the same way ChatEvents are drained.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{ClipboardEvent, Document, File, FileList, HtmlInputElement};

use orbit_core::attachment;
use orbit_types::{OrbitError, Result};

/// Raw file contents as handed over by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct FilePicker {
    picked: Rc<RefCell<VecDeque<Result<PickedFile>>>>,
}

impl FilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the browser's file dialog, restricted to images.
    /// `on_ready` runs once the chosen file has been read.
    pub fn open(&self, on_ready: impl FnOnce() + 'static) -> Result<()> {
        let document = document()?;

        let input: HtmlInputElement = document
            .create_element("input")
            .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))?;
        input.set_type("file");
        input.set_accept("image/*");

        let picked = self.picked.clone();
        let target = input.clone();
        let onchange = Closure::once(move |_: web_sys::Event| {
            let Some(file) = target.files().and_then(|files| files.get(0)) else {
                return;
            };
            wasm_bindgen_futures::spawn_local(async move {
                let result = read_file(file).await;
                picked.borrow_mut().push_back(result);
                on_ready();
            });
        });
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        input.click();
        Ok(())
    }

    /// Accept files pasted anywhere on the page. Text pastes are left alone.
    /// `on_ready` runs after each pasted file has been read.
    pub fn listen_for_paste(&self, on_ready: impl Fn() + 'static) -> Result<()> {
        let picked = self.picked.clone();
        let on_ready = Rc::new(on_ready);
        let onpaste = Closure::<dyn FnMut(ClipboardEvent)>::new(move |event: ClipboardEvent| {
            let Some(file) = event
                .clipboard_data()
                .and_then(|data| data.files())
                .and_then(|files| preferred_file(&files))
            else {
                return;
            };
            event.prevent_default();
            log::debug!("Pasted file {} ({})", file.name(), file.type_());

            let picked = picked.clone();
            let on_ready = on_ready.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = read_file(file).await;
                picked.borrow_mut().push_back(result);
                on_ready();
            });
        });

        document()?
            .add_event_listener_with_callback("paste", onpaste.as_ref().unchecked_ref())
            .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))?;
        onpaste.forget();
        Ok(())
    }

    /// Take everything that arrived since the last poll.
    pub fn drain(&self) -> Vec<Result<PickedFile>> {
        self.picked.borrow_mut().drain(..).collect()
    }
}

fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| OrbitError::JsInterop("No document".to_string()))
}

fn preferred_file(files: &FileList) -> Option<File> {
    let files: Vec<File> = (0..files.length()).filter_map(|i| files.get(i)).collect();
    let types: Vec<String> = files.iter().map(|f| f.type_()).collect();
    let index = attachment::preferred_file(types.iter().map(String::as_str))?;
    files.into_iter().nth(index)
}

async fn read_file(file: File) -> Result<PickedFile> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| OrbitError::JsInterop(format!("{:?}", e)))?;
    Ok(PickedFile {
        name: file.name(),
        mime_type: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}
