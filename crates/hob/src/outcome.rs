// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;

/// Describes what a component method, watcher or change hook returned.
/// For uses see:
///
/// * [`Component::method`](crate::component::Component::method)
/// * [`Component::watch`](crate::component::Component::watch)
/// * [`Component::on_changes`](crate::component::Component::on_changes)
///
/// Callbacks are invoked by the DOM or the reactivity layer, so there is no
/// caller to hand an error to. Failures are logged instead.
pub trait Outcome {
    fn report(self, context: &str);
}

/// Closures without return type always succeed.
impl Outcome for () {
    fn report(self, _: &str) {}
}

impl<E: Display> Outcome for Result<(), E> {
    fn report(self, context: &str) {
        if let Err(err) = self {
            log::error!("{context}: {err}");
        }
    }
}
