//! Best-effort image preloading
//!
//! Setup waits until every image has either loaded or failed. A failed image
//! only means a blank card face; it never blocks the round.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResult {
    Loaded,
    Failed,
}

/// Tracks which URLs have settled
#[derive(Debug, Clone, Default)]
pub struct Preloader {
    pending: HashMap<String, Option<LoadResult>>,
}

impl Preloader {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: urls.into_iter().map(|u| (u.into(), None)).collect(),
        }
    }

    /// Record the outcome for `url`. Returns true when this settles the last one.
    pub fn settle(&mut self, url: &str, result: LoadResult) -> bool {
        let was_complete = self.is_complete();
        match self.pending.get_mut(url) {
            Some(slot) if slot.is_none() => {
                if result == LoadResult::Failed {
                    log::warn!("Failed to load {} - continuing without it", url);
                }
                *slot = Some(result);
            }
            Some(_) => log::debug!("{} already settled", url),
            None => log::debug!("Ignoring unknown asset {}", url),
        }
        !was_complete && self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.pending.values().all(Option::is_some)
    }

    pub fn failed_count(&self) -> usize {
        self.pending
            .values()
            .filter(|r| **r == Some(LoadResult::Failed))
            .count()
    }
}

/// Load every image, resolving once all have loaded or errored
#[cfg(target_arch = "wasm32")]
pub async fn preload_images(urls: Vec<String>) -> Preloader {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    let tracker = Rc::new(RefCell::new(Preloader::new(urls.iter().cloned())));
    let promises = js_sys::Array::new();

    for url in urls {
        let image = match web_sys::HtmlImageElement::new() {
            Ok(image) => image,
            Err(_) => {
                tracker.borrow_mut().settle(&url, LoadResult::Failed);
                continue;
            }
        };
        let tracker = tracker.clone();
        let image_for_promise = image.clone();
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let on_load = {
                let tracker = tracker.clone();
                let url = url.clone();
                let resolve = resolve.clone();
                Closure::once_into_js(move |_event: web_sys::Event| {
                    tracker.borrow_mut().settle(&url, LoadResult::Loaded);
                    let _ = resolve.call0(&JsValue::NULL);
                })
            };
            let on_error = {
                let tracker = tracker.clone();
                let url = url.clone();
                Closure::once_into_js(move |_event: web_sys::Event| {
                    tracker.borrow_mut().settle(&url, LoadResult::Failed);
                    let _ = resolve.call0(&JsValue::NULL);
                })
            };
            image_for_promise.set_onload(Some(on_load.unchecked_ref()));
            image_for_promise.set_onerror(Some(on_error.unchecked_ref()));
        });
        image.set_src(&url);
        promises.push(&promise);
    }

    let _ = wasm_bindgen_futures::JsFuture::from(js_sys::Promise::all(&promises)).await;

    let preloader = tracker.borrow().clone();
    log::info!(
        "Preloaded card images ({} failed)",
        preloader.failed_count()
    );
    preloader
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_with_failures() {
        let mut loader = Preloader::new(["a.png", "b.png"]);
        assert!(!loader.is_complete());
        assert!(!loader.settle("a.png", LoadResult::Failed));
        assert!(loader.settle("b.png", LoadResult::Loaded));
        assert!(loader.is_complete());
        assert_eq!(loader.failed_count(), 1);
    }

    #[test]
    fn test_duplicate_and_unknown_are_ignored() {
        let mut loader = Preloader::new(["a.png", "b.png"]);
        loader.settle("a.png", LoadResult::Loaded);
        assert!(!loader.settle("a.png", LoadResult::Failed));
        assert!(!loader.settle("zzz.png", LoadResult::Loaded));
        assert_eq!(loader.failed_count(), 0);
        assert!(!loader.is_complete());
    }

    #[test]
    fn test_empty_list_is_complete() {
        let loader = Preloader::new(Vec::<String>::new());
        assert!(loader.is_complete());
    }
}
