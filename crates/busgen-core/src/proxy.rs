//! Client-side stub generation.
//!
//! One `<Base>_proxy` class per interface, deriving from
//! `::DBus::InterfaceProxy`. The class body is written in a fixed order:
//! constructor, property accessors, invocation stubs (sync, then async),
//! abstract signal handlers, async completion handlers, completion stubs and
//! finally the signal unmarshal stubs.

use crate::classify::{Classified, classify, out_name, payload_name};
use crate::driver::{GenContext, ProxyModes};
use crate::emit::{CodeWriter, Visibility, VisibilityTracker};
use crate::error::GenResult;
use crate::model::{InterfaceDef, MethodDef, PropertyDef, SignalDef};
use crate::naming::{legalize, stub_name};
use crate::signature::{Param, ParamKind, Signature, method_signature};
use tracing::{debug, warn};

/// Suffix distinguishing proxy classes from adaptor classes.
pub const PROXY_SUFFIX: &str = "_proxy";

const BASE_CLASS: &str = "::DBus::InterfaceProxy";

/// Generate the complete proxy class for `iface`.
pub fn generate_proxy_class(
    iface: &InterfaceDef,
    class: &str,
    modes: ProxyModes,
    ctx: &GenContext<'_>,
) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let mut vis = VisibilityTracker::public();

    w.line(0, format!("class {class}"));
    w.line(0, format!(": public {BASE_CLASS}"));
    w.line(0, "{");
    w.line(0, "public:");
    w.blank();

    w.fragment(&constructor(iface, class, ctx));

    vis.switch(&mut w, Visibility::Public);
    w.line(1, "/* properties exported by this interface */");
    w.blank();
    for property in &iface.properties {
        w.fragment(&property_accessors(iface, property, ctx)?);
    }

    if modes.sync() {
        vis.switch(&mut w, Visibility::Public);
        w.fragment(&invocation_stubs(iface, class, false, ctx)?);
    }
    if modes.asynchronous() {
        vis.switch(&mut w, Visibility::Public);
        w.fragment(&invocation_stubs(iface, class, true, ctx)?);
    }

    vis.switch(&mut w, Visibility::Public);
    w.line(1, "/* signal handlers for this interface.");
    w.line(1, " * you will have to implement them in your ObjectProxy");
    w.line(1, " */");
    for signal in &iface.signals {
        w.line(1, format!("{} = 0;", signal_handler_signature(signal, ctx)?.render_virtual()));
    }

    if modes.asynchronous() {
        w.blank();
        vis.switch(&mut w, Visibility::Protected);
        w.line(1, "/* async method reply handlers for this interface.");
        w.line(1, " * you will have to implement them in your ObjectProxy");
        w.line(1, " */");
        w.blank();
        for method in &iface.methods {
            w.fragment(&completion_handler(method, ctx)?);
        }

        vis.switch(&mut w, Visibility::Private);
        w.line(
            1,
            "/* unmarshallers (to steal the PendingCall reply and unmarshall args before invoking the reply callback)",
        );
        w.line(1, " */");
        for method in &iface.methods {
            w.fragment(&completion_stub(method, ctx)?);
        }
    }

    w.blank();
    vis.switch(&mut w, Visibility::Private);
    w.line(
        1,
        "/* unmarshallers (to unpack the DBus message before calling the actual signal handler)",
    );
    w.line(1, " */");
    for signal in &iface.signals {
        w.fragment(&signal_stub(signal, ctx)?);
    }

    w.line(0, "};");
    w.blank();

    Ok(w.finish())
}

/// Constructor registering one dispatch binding per signal.
fn constructor(iface: &InterfaceDef, class: &str, ctx: &GenContext<'_>) -> String {
    let mut w = CodeWriter::new(ctx.config);

    w.line(1, format!("{class}()"));
    w.line(1, format!(": {BASE_CLASS}(\"{}\")", iface.name));
    w.line(1, "{");
    for signal in &iface.signals {
        w.line(
            2,
            format!(
                "connect_signal({class}, {}, {});",
                signal.name,
                stub_name(&signal.name)
            ),
        );
    }
    w.line(1, "}");
    w.blank();

    w.finish()
}

/// Getter and/or setter for one property, per its access mode.
fn property_accessors(
    iface: &InterfaceDef,
    property: &PropertyDef,
    ctx: &GenContext<'_>,
) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let name = legalize(&property.name);
    let host_type = ctx.types.host_type(&property.signature)?;
    let properties_iface = &ctx.config.properties_interface;

    if !property.access.readable() && !property.access.writable() {
        warn!(
            interface = %iface.name,
            property = %property.name,
            "property has no usable access mode; no accessor generated"
        );
    }

    if property.access.readable() {
        let qualifier = if ctx.types.is_primitive(&property.signature) {
            ""
        } else {
            "const "
        };
        w.line(1, format!("{qualifier}{host_type} {name}()"));
        w.line(1, "{");
        w.line(2, "::DBus::CallMessage __call;");
        w.line(
            2,
            format!("__call.member(\"Get\"); __call.interface(\"{properties_iface}\");"),
        );
        w.line(2, "::DBus::MessageIter __wi = __call.writer();");
        w.line(
            2,
            format!("const std::string interface_name = \"{}\";", iface.name),
        );
        w.line(
            2,
            format!("const std::string property_name  = \"{}\";", property.name),
        );
        w.line(2, "__wi << interface_name;");
        w.line(2, "__wi << property_name;");
        w.line(2, "::DBus::Message __ret = this->invoke_method(__call);");
        w.line(2, "::DBus::MessageIter __ri = __ret.reader();");
        w.line(2, "::DBus::Variant __argout;");
        w.line(2, "__ri >> __argout;");
        w.line(2, "return __argout;");
        w.line(1, "}");
    }

    if property.access.writable() {
        w.line(1, format!("void {name}(const {host_type}& input)"));
        w.line(1, "{");
        w.line(2, "::DBus::CallMessage __call;");
        w.line(
            2,
            format!("__call.member(\"Set\"); __call.interface(\"{properties_iface}\");"),
        );
        w.line(2, "::DBus::MessageIter __wi = __call.writer();");
        w.line(2, "::DBus::Variant __value;");
        w.line(2, "::DBus::MessageIter vi = __value.writer();");
        w.line(2, "vi << input;");
        w.line(
            2,
            format!("const std::string interface_name = \"{}\";", iface.name),
        );
        w.line(
            2,
            format!("const std::string property_name  = \"{}\";", property.name),
        );
        w.line(2, "__wi << interface_name;");
        w.line(2, "__wi << property_name;");
        w.line(2, "__wi << __value;");
        w.line(2, "this->invoke_method(__call);");
        w.line(1, "}");
    }

    w.blank();
    Ok(w.finish())
}

/// Invocation stubs for every method, in one calling convention.
fn invocation_stubs(
    iface: &InterfaceDef,
    class: &str,
    asynchronous: bool,
    ctx: &GenContext<'_>,
) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let mode = if asynchronous {
        "non-blocking versions of the "
    } else {
        ""
    };

    w.line(1, format!("/* {mode}methods exported by this interface."));
    w.line(
        1,
        " * these functions will invoke the corresponding methods on the remote objects",
    );
    w.line(1, " */");

    for method in &iface.methods {
        debug!(interface = %iface.name, method = %method.name, asynchronous, "proxy method");
        if asynchronous {
            w.fragment(&async_stub(method, class, ctx)?);
        } else {
            w.fragment(&sync_stub(method, &classify(method), ctx)?);
        }
    }

    Ok(w.finish())
}

/// Signature of the non-blocking invocation stub: always `void`, in-arguments
/// followed by the user data and the timeout.
pub fn async_signature(method: &MethodDef, ctx: &GenContext<'_>) -> GenResult<Signature> {
    let classified = classify(method);
    let mut sig = method_signature(method, &classified, ctx.types)?;

    sig.return_type = "void".to_string();
    sig.params.retain(|p| p.kind == ParamKind::In);
    sig.params.push(Param::extra("void*", "__data"));
    sig.params.push(Param::extra("int", "__timeout=-1"));

    Ok(sig)
}

/// Lines building `__call` and writing the in-arguments into it.
fn build_call(w: &mut CodeWriter<'_>, method: &MethodDef, sig: &Signature) {
    let ins: Vec<&Param> = sig
        .params
        .iter()
        .filter(|p| p.kind == ParamKind::In)
        .collect();

    w.line(2, "::DBus::CallMessage __call;");
    if !ins.is_empty() {
        w.line(2, "::DBus::MessageIter __wi = __call.writer();");
        w.blank();
    }
    for param in ins {
        w.line(2, format!("__wi << {};", param.name));
    }
    w.line(2, format!("__call.member(\"{}\");", method.name));
}

fn sync_stub(
    method: &MethodDef,
    classified: &Classified<'_>,
    ctx: &GenContext<'_>,
) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let sig = method_signature(method, classified, ctx.types)?;

    w.line(1, sig.render());
    w.line(1, "{");
    build_call(&mut w, method, &sig);

    if classified.args_out.is_empty() {
        w.line(2, "invoke_method(__call);");
    } else {
        w.line(2, "::DBus::Message __ret = invoke_method(__call);");
        w.line(2, "::DBus::MessageIter __ri = __ret.reader();");
        w.blank();
    }

    match classified.direct_return() {
        Some(_) => {
            w.line(2, format!("{} __argout;", sig.return_type));
            w.line(2, "__ri >> __argout;");
            w.line(2, "return __argout;");
        }
        None => {
            for param in sig.out_refs() {
                w.line(2, format!("__ri >> {};", param.name));
            }
        }
    }

    w.line(1, "}");
    w.blank();
    Ok(w.finish())
}

fn async_stub(method: &MethodDef, class: &str, ctx: &GenContext<'_>) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let sig = async_signature(method, ctx)?;
    let name = legalize(&method.name);

    w.line(1, sig.render());
    w.line(1, "{");
    build_call(&mut w, method, &sig);
    w.line(
        2,
        "::DBus::PendingCall *__pending = invoke_method_async(__call, __timeout);",
    );
    w.line(2, "::DBus::AsyncReplyHandler __handler;");
    w.line(
        2,
        format!(
            "__handler = new ::DBus::Callback<{class}, void, ::DBus::PendingCall *>(this, &{class}::_{name}Callback_stub);"
        ),
    );
    w.line(2, "__pending->reply_handler(__handler);");
    w.line(2, "__pending->data(__data);");
    w.line(1, "}");
    w.blank();
    Ok(w.finish())
}

/// User-overridable completion handler; the default body asserts.
fn completion_handler(method: &MethodDef, ctx: &GenContext<'_>) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let classified = classify(method);
    let name = legalize(&method.name);

    let mut params = Vec::with_capacity(classified.args_out.len() + 2);
    for (i, arg) in classified.args_out.iter().enumerate() {
        let host_type = ctx.types.host_type(&arg.signature)?;
        params.push(format!("const {host_type}& /*{}*/", out_name(arg, i)));
    }
    params.push("const ::DBus::Error&".to_string());
    params.push("void*".to_string());

    w.line(1, format!("virtual void {name}Callback({})", params.join(", ")));
    w.line(1, "{");
    w.line(2, format!("assert(!\"Implement {name}Callback\");"));
    w.line(1, "}");
    w.blank();
    Ok(w.finish())
}

/// Private stub run when the pending call completes.
fn completion_stub(method: &MethodDef, ctx: &GenContext<'_>) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let classified = classify(method);
    let name = legalize(&method.name);
    let has_outs = !classified.args_out.is_empty();

    w.line(1, format!("void _{name}Callback_stub(::DBus::PendingCall *__call)"));
    w.line(1, "{");
    w.line(2, "::DBus::Message __reply = __call->steal_reply();");
    w.line(2, "void *__data = __call->data();");
    w.line(2, "remove_pending_call(__call);");
    if has_outs {
        w.line(2, "::DBus::MessageIter __ri = __reply.reader();");
    }
    w.line(2, "::DBus::Error __error(__reply);");

    let mut names = Vec::with_capacity(classified.args_out.len());
    for (i, arg) in classified.args_out.iter().enumerate() {
        let local = out_name(arg, i);
        w.line(2, format!("{} {local};", ctx.types.host_type(&arg.signature)?));
        names.push(local);
    }
    if has_outs {
        w.line(2, "if (!__error.is_set()) {");
        for local in &names {
            w.line(3, format!("__ri >> {local};"));
        }
        w.line(2, "}");
    }

    names.push("__error".to_string());
    names.push("__data".to_string());
    w.line(2, format!("{name}Callback({});", names.join(", ")));
    w.line(1, "}");
    w.blank();
    Ok(w.finish())
}

/// Signature of the abstract handler a concrete proxy implements for `signal`.
pub fn signal_handler_signature(signal: &SignalDef, ctx: &GenContext<'_>) -> GenResult<Signature> {
    let params = signal
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let host_type = ctx.types.host_type(&arg.signature)?;
            Ok(Param::input(host_type, payload_name(arg, i)))
        })
        .collect::<GenResult<Vec<_>>>()?;

    Ok(Signature {
        return_type: "void".to_string(),
        name: legalize(&signal.name),
        params,
    })
}

/// Private stub decoding a signal's payload and forwarding it to the handler.
fn signal_stub(signal: &SignalDef, ctx: &GenContext<'_>) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);
    let handler = signal_handler_signature(signal, ctx)?;

    w.line(
        1,
        format!(
            "void {}(const ::DBus::SignalMessage &sig)",
            stub_name(&signal.name)
        ),
    );
    w.line(1, "{");
    if !handler.params.is_empty() {
        w.line(2, "::DBus::MessageIter __ri = sig.reader();");
        w.blank();
    }
    for param in &handler.params {
        w.line(2, format!("{} {}; __ri >> {};", param.ty, param.name, param.name));
    }

    let args: Vec<&str> = handler.params.iter().map(|p| p.name.as_str()).collect();
    w.line(2, format!("{}({});", handler.name, args.join(", ")));
    w.line(1, "}");
    Ok(w.finish())
}
