//! DOM wiring: renders the tweet list and routes form and list events into
//! the [`Editor`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, warn};
use tweetbox_core::{
    Action, Editor, Error, ListEntry, Notice, NoteStore, DELETE_MARKER, EDIT_MARKER,
    ID_ATTRIBUTE, NOTICE_TIMEOUT_MS,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement,
    KeyboardEvent, Window,
};

use crate::{LocalStorage, WebConfig};

/// The running page: editor state plus the elements it drives.
pub struct App {
    editor: Editor<LocalStorage>,
    window: Window,
    document: Document,
    list: Element,
    form: HtmlFormElement,
    input: HtmlTextAreaElement,
    submit: Option<HtmlInputElement>,
    messages: Element,
}

impl App {
    /// Find the configured elements, load stored tweets and render them.
    ///
    /// A corrupt stored collection is reported and replaced by an empty list
    /// in memory; the stored value is left alone until the next change.
    pub fn mount(window: Window, config: &WebConfig) -> Result<Rc<RefCell<App>>, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let list = find(&document, &config.list)?;
        let form: HtmlFormElement = find(&document, &config.form)?.dyn_into()?;
        let input: HtmlTextAreaElement = find(&document, &config.input)?.dyn_into()?;
        let messages = find(&document, &config.messages)?;
        let submit = form
            .query_selector(&config.submit)?
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if submit.is_none() {
            warn!("no submit control matches {:?}", config.submit);
        }

        let storage = LocalStorage::from_window(&window).map_err(to_js)?;
        let (store, load_error) = match NoteStore::load(storage.clone()) {
            Ok(store) => (store, None),
            Err(e) => {
                error!("failed to load tweets: {}", e);
                (NoteStore::empty(storage), Some(e))
            }
        };

        let app = App {
            editor: Editor::new(store),
            window,
            document,
            list,
            form,
            input,
            submit,
            messages,
        };
        app.render()?;
        if let Some(e) = load_error {
            app.notify(&Notice::from(&e))?;
        }

        let app = Rc::new(RefCell::new(app));
        attach_listeners(&app)?;
        Ok(app)
    }

    pub fn tweet_count(&self) -> usize {
        self.editor.store().len()
    }

    /// Form submit: create or update, then clear the input and re-render.
    fn on_submit(&mut self) -> Result<(), JsValue> {
        let text = self.input.value();

        match self.editor.submit(&text) {
            Ok(submitted) => {
                debug!("submitted {:?}", submitted);
                self.input.set_value("");
                self.sync_label();
                self.render()?;
                self.notify(&Notice::from(submitted))
            }
            Err(Error::NotFound(what)) => {
                // The tweet vanished mid-edit; the editor is idle again.
                warn!("{} disappeared while being edited", what);
                self.sync_label();
                self.render()
            }
            Err(e) => self.notify(&Notice::from(&e)),
        }
    }

    /// Click anywhere in the list: route delete/edit controls.
    fn on_list_click(&mut self, event: &Event) -> Result<(), JsValue> {
        let Some(target) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
        else {
            return Ok(());
        };

        let classes = class_names(&target);
        let id_attribute = target
            .closest(&format!("[{}]", ID_ATTRIBUTE))?
            .and_then(|entry| entry.get_attribute(ID_ATTRIBUTE));

        let Some(action) =
            Action::from_target(classes.iter().map(String::as_str), id_attribute.as_deref())
        else {
            return Ok(());
        };
        event.prevent_default();

        match action {
            Action::Delete(id) => match self.editor.delete(id) {
                Ok(_) => {
                    self.sync_label();
                    self.render()
                }
                Err(e) => self.notify(&Notice::from(&e)),
            },
            Action::Edit(id) => {
                if let Some(text) = self.editor.begin_edit(id) {
                    self.input.set_value(text);
                    self.sync_label();
                    self.input.focus()?;
                }
                Ok(())
            }
        }
    }

    /// Escape in the input abandons an edit in progress.
    fn on_key(&mut self, event: &KeyboardEvent) {
        if event.key() == "Escape" && self.editor.is_editing() {
            self.editor.cancel_edit();
            self.input.set_value("");
            self.sync_label();
        }
    }

    /// Rebuild the list from scratch.
    fn render(&self) -> Result<(), JsValue> {
        while let Some(child) = self.list.first_child() {
            self.list.remove_child(&child)?;
        }

        for entry in ListEntry::all(self.editor.store().notes()) {
            let li = self.document.create_element("li")?;
            li.set_class_name("tweet");
            li.set_attribute(ID_ATTRIBUTE, &entry.id_attribute())?;
            li.set_text_content(Some(entry.text));

            let delete = self.control(DELETE_MARKER, "X")?;
            let edit = self.control(EDIT_MARKER, "Edit")?;
            li.append_child(&delete)?;
            li.append_child(&edit)?;

            self.list.append_child(&li)?;
        }
        Ok(())
    }

    fn control(&self, marker: &str, label: &str) -> Result<Element, JsValue> {
        let a = self.document.create_element("a")?;
        a.set_class_name(marker);
        a.set_attribute("href", "#")?;
        a.set_text_content(Some(label));
        Ok(a)
    }

    fn sync_label(&self) {
        if let Some(submit) = &self.submit {
            submit.set_value(self.editor.submit_label());
        }
    }

    /// Show a notice and schedule its removal.
    fn notify(&self, notice: &Notice) -> Result<(), JsValue> {
        let p = self.document.create_element("p")?;
        p.set_class_name(notice.kind.class());
        p.set_text_content(Some(&notice.message));
        self.messages.append_child(&p)?;

        let remove = Closure::once_into_js(move || p.remove());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                remove.unchecked_ref::<js_sys::Function>(),
                NOTICE_TIMEOUT_MS,
            )?;
        Ok(())
    }
}

fn attach_listeners(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let (form, list, input) = {
        let app = app.borrow();
        (app.form.clone(), app.list.clone(), app.input.clone())
    };

    let handle = app.clone();
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        if let Err(e) = handle.borrow_mut().on_submit() {
            error!("submit failed: {:?}", e);
        }
    });
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    on_submit.forget();

    let handle = app.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Err(e) = handle.borrow_mut().on_list_click(&event) {
            error!("list click failed: {:?}", e);
        }
    });
    list.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let handle = app.clone();
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        handle.borrow_mut().on_key(&event);
    });
    input.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();

    Ok(())
}

fn find(document: &Document, selector: &str) -> Result<Element, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("no element matches {}", selector)))
}

fn class_names(element: &Element) -> Vec<String> {
    let classes = element.class_list();
    (0..classes.length()).filter_map(|i| classes.item(i)).collect()
}

fn to_js(error: Error) -> JsValue {
    JsValue::from_str(&error.to_string())
}
