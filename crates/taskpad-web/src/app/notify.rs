use anyhow::anyhow;
use taskpad_shared::notify::{
  NotificationSink,
  Permission,
  Reminder
};

/// Desktop notifications through the
/// browser's Notification API.
#[derive(Debug, Default)]
pub struct BrowserNotifier;

impl NotificationSink for BrowserNotifier {
  fn permission(&self) -> Permission {
    browser_permission()
  }

  fn request_permission(&mut self) {
    match web_sys::Notification::request_permission()
    {
      | Ok(promise) => {
        wasm_bindgen_futures::spawn_local(
          async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
              | Ok(_) => {
                tracing::info!(
                  permission = ?browser_permission(),
                  "notification permission request completed"
                );
              }
              | Err(error) => {
                tracing::error!(
                  error = ?error,
                  "notification permission request failed"
                );
              }
            }
          }
        );
      }
      | Err(error) => {
        tracing::error!(
          error = ?error,
          "failed starting notification \
           permission request"
        );
      }
    }
  }

  fn emit(
    &mut self,
    reminder: &Reminder
  ) -> anyhow::Result<()> {
    let options =
      web_sys::NotificationOptions::new();
    options.set_body(&reminder.body);

    web_sys::Notification::new_with_options(
      &reminder.title,
      &options
    )
    .map(|_| ())
    .map_err(|error| {
      anyhow!(
        "failed to show notification: \
         {error:?}"
      )
    })
  }
}

fn browser_permission() -> Permission {
  let Some(window) = web_sys::window()
  else {
    return Permission::Unsupported;
  };

  let has_notification =
    js_sys::Reflect::has(
      window.as_ref(),
      &wasm_bindgen::JsValue::from_str(
        "Notification"
      )
    )
    .unwrap_or(false);

  if !has_notification {
    return Permission::Unsupported;
  }

  match web_sys::Notification::permission()
  {
    | web_sys::NotificationPermission::Default => {
      Permission::Default
    }
    | web_sys::NotificationPermission::Granted => {
      Permission::Granted
    }
    | web_sys::NotificationPermission::Denied => {
      Permission::Denied
    }
    | _ => Permission::Unsupported
  }
}
