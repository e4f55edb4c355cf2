//! Chrome DevTools Protocol backend.
//!
//! Drives a real chromium over chromiumoxide behind the synchronous
//! [`PageDriver`] facade: the driver owns a private tokio runtime and blocks
//! on each protocol call, so test scripts stay single-threaded.
//!
//! DOM predicates and getters run as JavaScript evaluations against a
//! window-side element registry (`window.__comprar.els`); handle ids index
//! into it. Navigation resets the registry, so handles held across a
//! navigation naturally report stale. Pointer input goes through real
//! `Input.dispatchMouseEvent` / `Input.dispatchKeyEvent` commands rather
//! than synthetic DOM events, so CSS `:hover` overlays and key filters
//! behave as they do for a user.

use crate::config::Config;
use crate::driver::{ElementHandle, PageDriver};
use crate::locator::Locator;
use crate::result::{ComprarError, ComprarResult};
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Mutex;

/// Result of a registry lookup that must distinguish stale from empty
#[derive(Debug, Deserialize)]
struct JsLookup {
    stale: bool,
    value: Option<String>,
}

/// Center of an element's bounding box, in viewport coordinates
#[derive(Debug, Deserialize)]
struct Center {
    x: f64,
    y: f64,
}

/// CDP-backed implementation of [`PageDriver`]
pub struct CdpDriver {
    runtime: tokio::runtime::Runtime,
    browser: Mutex<Option<Browser>>,
    page: Page,
}

impl std::fmt::Debug for CdpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDriver").finish_non_exhaustive()
    }
}

impl CdpDriver {
    /// Launch a browser and open a blank page.
    pub fn launch(config: &Config) -> ComprarResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let headless = config.headless;
        let chromium_path = config.chromium_path.clone();
        let (browser, page) = runtime.block_on(async move {
            let mut builder = CdpConfig::builder().window_size(2560, 1440);
            if !headless {
                builder = builder.with_head();
            }
            builder = builder.no_sandbox();
            if let Some(ref path) = chromium_path {
                builder = builder.chrome_executable(path);
            }
            let cdp_config = builder.build().map_err(ComprarError::driver)?;

            let (browser, mut handler) = Browser::launch(cdp_config)
                .await
                .map_err(|e| ComprarError::driver(e.to_string()))?;

            // Drive the protocol event loop for the browser's lifetime.
            let _ = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ComprarError::driver(e.to_string()))?;

            Ok::<_, ComprarError>((browser, page))
        })?;

        tracing::info!(headless, "cdp browser launched");
        Ok(Self {
            runtime,
            browser: Mutex::new(Some(browser)),
            page,
        })
    }

    fn eval<T: DeserializeOwned>(&self, expr: String) -> ComprarResult<T> {
        self.runtime.block_on(async {
            let result = self
                .page
                .evaluate(expr)
                .await
                .map_err(|e| ComprarError::driver(e.to_string()))?;
            result
                .into_value::<T>()
                .map_err(|e| ComprarError::driver(e.to_string()))
        })
    }

    /// Wrap a JS body with access to the registered element `el`
    fn el_expr(id: u64, body: &str) -> String {
        format!(
            "(() => {{ const els = (window.__comprar || {{ els: [] }}).els; \
             const el = els[{id}]; {body} }})()"
        )
    }

    fn lookup(&self, el: &ElementHandle, js_value: &str) -> ComprarResult<Option<String>> {
        let body = format!(
            "if (!el || !el.isConnected) return {{ stale: true, value: null }}; \
             return {{ stale: false, value: {js_value} }};"
        );
        let looked: JsLookup = self.eval(Self::el_expr(el.id, &body))?;
        if looked.stale {
            return Err(ComprarError::driver(format!(
                "stale element: {}",
                el.locator
            )));
        }
        Ok(looked.value)
    }

    fn center(&self, el: &ElementHandle) -> ComprarResult<Center> {
        let body = "if (!el || !el.isConnected) return { x: -1, y: -1 }; \
                    const r = el.getBoundingClientRect(); \
                    return { x: r.left + r.width / 2, y: r.top + r.height / 2 };";
        let center: Center = self.eval(Self::el_expr(el.id, body))?;
        if center.x < 0.0 {
            return Err(ComprarError::driver(format!(
                "stale element: {}",
                el.locator
            )));
        }
        Ok(center)
    }

    fn dispatch_mouse(
        &self,
        kind: DispatchMouseEventType,
        x: f64,
        y: f64,
        click: bool,
    ) -> ComprarResult<()> {
        let mut builder = DispatchMouseEventParams::builder().r#type(kind).x(x).y(y);
        if click {
            builder = builder.button(MouseButton::Left).click_count(1);
        }
        let params = builder.build().map_err(ComprarError::driver)?;
        self.runtime.block_on(async {
            self.page
                .execute(params)
                .await
                .map_err(|e| ComprarError::driver(e.to_string()))?;
            Ok(())
        })
    }

    fn dispatch_char(&self, ch: char) -> ComprarResult<()> {
        let params = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::Char)
            .text(ch.to_string())
            .build()
            .map_err(ComprarError::driver)?;
        self.runtime.block_on(async {
            self.page
                .execute(params)
                .await
                .map_err(|e| ComprarError::driver(e.to_string()))?;
            Ok(())
        })
    }

    fn focus(&self, el: &ElementHandle) -> ComprarResult<()> {
        let _: bool = self.eval(Self::el_expr(
            el.id,
            "if (!el || !el.isConnected) return false; el.focus(); return true;",
        ))?;
        Ok(())
    }

    fn js_string(text: &str) -> ComprarResult<String> {
        Ok(serde_json::to_string(text)?)
    }
}

impl Drop for CdpDriver {
    fn drop(&mut self) {
        if let Some(mut browser) = self.browser.lock().unwrap().take() {
            let _ = self.runtime.block_on(async { browser.close().await });
        }
    }
}

impl PageDriver for CdpDriver {
    fn navigate(&self, url: &str) -> ComprarResult<()> {
        self.runtime.block_on(async {
            self.page
                .goto(url)
                .await
                .map_err(|e| ComprarError::driver(format!("navigation to {url} failed: {e}")))?;
            Ok(())
        })
    }

    fn refresh(&self) -> ComprarResult<()> {
        let url = self.current_url()?;
        self.navigate(&url)
    }

    fn current_url(&self) -> ComprarResult<String> {
        self.eval("window.location.href".to_string())
    }

    fn title(&self) -> ComprarResult<String> {
        self.eval("document.title".to_string())
    }

    fn find_all(&self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>> {
        let expr = format!(
            "(() => {{ const w = window; w.__comprar = w.__comprar || {{ els: [] }}; \
             const found = {}; \
             return found.map(el => w.__comprar.els.push(el) - 1); }})()",
            locator.to_query_all()
        );
        let ids: Vec<u64> = self.eval(expr)?;
        Ok(ids
            .into_iter()
            .map(|id| ElementHandle::new(id, locator.to_string()))
            .collect())
    }

    fn is_attached(&self, el: &ElementHandle) -> ComprarResult<bool> {
        self.eval(Self::el_expr(el.id, "return !!(el && el.isConnected);"))
    }

    fn is_visible(&self, el: &ElementHandle) -> ComprarResult<bool> {
        self.eval(Self::el_expr(
            el.id,
            "if (!el || !el.isConnected) return false; \
             const s = getComputedStyle(el); \
             if (s.display === 'none' || s.visibility === 'hidden') return false; \
             return !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length);",
        ))
    }

    fn is_enabled(&self, el: &ElementHandle) -> ComprarResult<bool> {
        self.eval(Self::el_expr(
            el.id,
            "if (!el || !el.isConnected) return false; return !el.disabled;",
        ))
    }

    fn is_selected(&self, el: &ElementHandle) -> ComprarResult<bool> {
        self.eval(Self::el_expr(
            el.id,
            "if (!el || !el.isConnected) return false; return !!(el.checked || el.selected);",
        ))
    }

    fn text(&self, el: &ElementHandle) -> ComprarResult<String> {
        Ok(self.lookup(el, "el.innerText")?.unwrap_or_default())
    }

    fn value(&self, el: &ElementHandle) -> ComprarResult<String> {
        Ok(self
            .lookup(el, "('value' in el) ? String(el.value) : ''")?
            .unwrap_or_default())
    }

    fn attribute(&self, el: &ElementHandle, name: &str) -> ComprarResult<Option<String>> {
        let name = Self::js_string(name)?;
        self.lookup(el, &format!("el.getAttribute({name})"))
    }

    fn click(&self, el: &ElementHandle) -> ComprarResult<()> {
        let center = self.center(el)?;
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, center.x, center.y, false)?;
        self.dispatch_mouse(
            DispatchMouseEventType::MousePressed,
            center.x,
            center.y,
            true,
        )?;
        self.dispatch_mouse(
            DispatchMouseEventType::MouseReleased,
            center.x,
            center.y,
            true,
        )
    }

    fn clear(&self, el: &ElementHandle) -> ComprarResult<()> {
        let _: bool = self.eval(Self::el_expr(
            el.id,
            "if (!el || !el.isConnected) return false; \
             el.value = ''; \
             el.dispatchEvent(new Event('input', { bubbles: true })); \
             el.dispatchEvent(new Event('change', { bubbles: true })); \
             return true;",
        ))?;
        Ok(())
    }

    fn type_text(&self, el: &ElementHandle, text: &str) -> ComprarResult<()> {
        let quoted = Self::js_string(text)?;
        let body = format!(
            "if (!el || !el.isConnected) return false; \
             el.focus(); el.value = {quoted}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true;"
        );
        let _: bool = self.eval(Self::el_expr(el.id, &body))?;
        Ok(())
    }

    fn press_keys(&self, el: &ElementHandle, text: &str) -> ComprarResult<()> {
        self.focus(el)?;
        for ch in text.chars() {
            self.dispatch_char(ch)?;
        }
        Ok(())
    }

    fn hover(&self, el: &ElementHandle) -> ComprarResult<()> {
        let center = self.center(el)?;
        self.dispatch_mouse(DispatchMouseEventType::MouseMoved, center.x, center.y, false)
    }

    fn scroll_into_view(&self, el: &ElementHandle) -> ComprarResult<()> {
        let _: bool = self.eval(Self::el_expr(
            el.id,
            "if (!el || !el.isConnected) return false; \
             el.scrollIntoView({ block: 'center', inline: 'center' }); \
             return true;",
        ))?;
        Ok(())
    }

    fn screenshot(&self) -> ComprarResult<Vec<u8>> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.runtime.block_on(async {
            let response = self
                .page
                .execute(params)
                .await
                .map_err(|e| ComprarError::driver(e.to_string()))?;
            base64::engine::general_purpose::STANDARD
                .decode(&response.data)
                .map_err(|e| ComprarError::driver(format!("screenshot decode failed: {e}")))
        })
    }
}
