use std::sync::Arc;
use weft_ioc::{AsShared, Injector, Qualifier};

trait Notifier: Send + Sync {
  fn notify(&self, message: &str) -> String;
}

struct EmailNotifier;
impl Notifier for EmailNotifier {
  fn notify(&self, message: &str) -> String {
    format!("email: {message}")
  }
}
impl AsShared<dyn Notifier> for EmailNotifier {
  fn into_shared(self: Arc<Self>) -> Arc<dyn Notifier> {
    self
  }
}

struct SmsNotifier;
impl Notifier for SmsNotifier {
  fn notify(&self, message: &str) -> String {
    format!("sms: {message}")
  }
}
impl AsShared<dyn Notifier> for SmsNotifier {
  fn into_shared(self: Arc<Self>) -> Arc<dyn Notifier> {
    self
  }
}

fn main() {
  let injector = Injector::new();

  // The default notifier plus one qualified alternative. Qualifiers are
  // attribute sets; the `named` shorthand is the common single-attribute
  // case.
  injector.bind::<dyn Notifier>().to_provider_fn(|| EmailNotifier);
  injector
    .bind_qualified::<dyn Notifier>(&Qualifier::named("urgent"))
    .to_provider_fn(|| SmsNotifier);

  let default = injector.get::<dyn Notifier>().unwrap();
  let urgent = injector
    .get_qualified::<dyn Notifier>(&Qualifier::named("urgent"))
    .unwrap();

  println!("{}", default.notify("weekly digest ready"));
  println!("{}", urgent.notify("disk is full"));

  // Every binding registered under the logical type, in registration order.
  println!("--- All notifiers ---");
  for (qualifier, notifier) in injector.get_all::<dyn Notifier>().unwrap() {
    println!("{qualifier} -> {}", notifier.notify("ping"));
  }
}
