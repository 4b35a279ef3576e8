/// Assign one or more model fields and render only if any of them changed.
///
/// ```ignore
/// update_field!(model.is_connected, true)
///
/// update_field!(
///     model.is_connected, false;
///     model.last_reply, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // several fields, separated by `;`
    ($($field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $field != value {
                $field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    ($field:expr, $value:expr) => {{
        update_field!($field, $value;)
    }};
}
