//! Server-side stub generation.
//!
//! One `<Base>_adaptor` class per interface, deriving from
//! `::DBus::InterfaceAdaptor`. The concrete adaptor subclass implements the
//! abstract methods; everything else (registration, introspection, property
//! handles, signal emitters and call dispatch) is generated here.

use crate::classify::{Positional, classify, positional};
use crate::driver::GenContext;
use crate::emit::CodeWriter;
use crate::error::GenResult;
use crate::model::{ArgumentDef, Direction, InterfaceDef, MethodDef, SignalDef};
use crate::naming::{legalize, stub_name};
use crate::signature::{Param, method_signature};
use crate::type_map::TypeMapper;
use tracing::debug;

/// Suffix distinguishing adaptor classes from proxy classes.
pub const ADAPTOR_SUFFIX: &str = "_adaptor";

const BASE_CLASS: &str = "::DBus::InterfaceAdaptor";

/// Generate the complete adaptor class for `iface`.
pub fn generate_adaptor_class(
    iface: &InterfaceDef,
    class: &str,
    ctx: &GenContext<'_>,
) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);

    w.line(0, format!("class {class}"));
    w.line(0, format!(": public {BASE_CLASS}"));
    w.line(0, "{");
    w.line(0, "public:");
    w.blank();

    w.fragment(&constructor(iface, class, ctx));
    w.fragment(&introspection(iface, class, ctx));

    w.line(0, "public:");
    w.blank();
    w.line(1, "/* properties exposed by this interface, use");
    w.line(
        1,
        " * property() and property(value) to get and set a particular property",
    );
    w.line(1, " */");
    for property in &iface.properties {
        let host_type = ctx.types.host_type(&property.signature)?;
        w.line(
            1,
            format!(
                "::DBus::PropertyAdaptor< {host_type} > {};",
                legalize(&property.name)
            ),
        );
    }
    w.blank();

    w.line(0, "public:");
    w.blank();
    w.line(1, "/* methods exported by this interface,");
    w.line(1, " * you will have to implement them in your ObjectAdaptor");
    w.line(1, " */");
    for method in &iface.methods {
        w.line(1, format!("{} = 0;", abstract_signature(method, ctx.types)?));
    }
    w.blank();

    w.line(0, "public:");
    w.blank();
    w.line(1, "/* signal emitters for this interface");
    w.line(1, " */");
    for signal in &iface.signals {
        w.fragment(&signal_emitter(signal, ctx)?);
    }
    w.blank();

    w.line(0, "private:");
    w.blank();
    w.line(
        1,
        "/* unmarshalers (to unpack the DBus message before calling the actual interface method)",
    );
    w.line(1, " */");
    for method in &iface.methods {
        debug!(interface = %iface.name, method = %method.name, "adaptor dispatch stub");
        let plan = DispatchPlan::build(method, ctx.types)?;
        w.fragment(&plan.render(ctx));
    }

    w.line(0, "};");
    w.blank();

    Ok(w.finish())
}

/// Constructor binding every property, then registering every method.
fn constructor(iface: &InterfaceDef, class: &str, ctx: &GenContext<'_>) -> String {
    let mut w = CodeWriter::new(ctx.config);

    w.line(1, format!("{class}()"));
    w.line(1, format!(": {BASE_CLASS}(\"{}\")", iface.name));
    w.line(1, "{");
    for property in &iface.properties {
        w.line(
            2,
            format!(
                "bind_property({}, \"{}\", {}, {});",
                legalize(&property.name),
                property.signature,
                property.access.readable(),
                property.access.writable()
            ),
        );
    }
    for method in &iface.methods {
        w.line(
            2,
            format!(
                "register_method({class}, {}, {});",
                method.name,
                stub_name(&method.name)
            ),
        );
    }
    w.line(1, "}");
    w.blank();

    w.finish()
}

/// `introspect()` returning the static metadata tables of the interface.
fn introspection(iface: &InterfaceDef, class: &str, ctx: &GenContext<'_>) -> String {
    let mut w = CodeWriter::new(ctx.config);

    w.line(
        1,
        "::DBus::IntrospectedInterface *const introspect() const ",
    );
    w.line(1, "{");

    for method in &iface.methods {
        argument_table(&mut w, &method_args_table(method), &method.args, true);
    }
    for signal in &iface.signals {
        argument_table(&mut w, &signal_args_table(signal), &signal.args, false);
    }

    w.line(2, format!("static ::DBus::IntrospectedMethod {class}_methods[] ="));
    w.line(2, "{");
    for method in &iface.methods {
        w.line(
            3,
            format!("{{ \"{}\", {} }},", method.name, method_args_table(method)),
        );
    }
    w.line(3, "{ 0, 0 }");
    w.line(2, "};");

    w.line(2, format!("static ::DBus::IntrospectedMethod {class}_signals[] ="));
    w.line(2, "{");
    for signal in &iface.signals {
        w.line(
            3,
            format!("{{ \"{}\", {} }},", signal.name, signal_args_table(signal)),
        );
    }
    w.line(3, "{ 0, 0 }");
    w.line(2, "};");

    w.line(
        2,
        format!("static ::DBus::IntrospectedProperty {class}_properties[] ="),
    );
    w.line(2, "{");
    for property in &iface.properties {
        w.line(
            3,
            format!(
                "{{ \"{}\", \"{}\", {}, {} }},",
                property.name,
                property.signature,
                property.access.readable(),
                property.access.writable()
            ),
        );
    }
    w.line(3, "{ 0, 0, 0, 0 }");
    w.line(2, "};");

    w.line(
        2,
        format!("static ::DBus::IntrospectedInterface {class}_interface ="),
    );
    w.line(2, "{");
    w.line(3, format!("\"{}\",", iface.name));
    w.line(3, format!("{class}_methods,"));
    w.line(3, format!("{class}_signals,"));
    w.line(3, format!("{class}_properties"));
    w.line(2, "};");
    w.line(2, format!("return &{class}_interface;"));
    w.line(1, "}");
    w.blank();

    w.finish()
}

fn method_args_table(method: &MethodDef) -> String {
    format!("{}_method_args", legalize(&method.name))
}

fn signal_args_table(signal: &SignalDef) -> String {
    format!("{}_signal_args", legalize(&signal.name))
}

/// One `IntrospectedArgument` array. Signal arguments never carry the in flag.
fn argument_table(w: &mut CodeWriter<'_>, table: &str, args: &[ArgumentDef], is_method: bool) {
    w.line(2, format!("static ::DBus::IntrospectedArgument {table}[] ="));
    w.line(2, "{");
    for arg in args {
        let name = if arg.is_anonymous() {
            "0".to_string()
        } else {
            format!("\"{}\"", arg.name)
        };
        let is_in = is_method && arg.direction == Direction::In;
        w.line(3, format!("{{ {name}, \"{}\", {is_in} }},", arg.signature));
    }
    w.line(3, "{ 0, 0, 0 }");
    w.line(2, "};");
}

/// The pure virtual declaration the concrete adaptor implements.
pub fn abstract_signature(method: &MethodDef, types: &dyn TypeMapper) -> GenResult<String> {
    let mut sig = method_signature(method, &classify(method), types)?;
    sig.params.push(Param::extra("::DBus::Error", "&error"));
    Ok(sig.render_virtual())
}

/// Helper building and emitting the notification for `signal`.
fn signal_emitter(signal: &SignalDef, ctx: &GenContext<'_>) -> GenResult<String> {
    let mut w = CodeWriter::new(ctx.config);

    let params = signal
        .args
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            let host_type = ctx.types.host_type(&arg.signature)?;
            Ok(Param::input(host_type, positional(Positional::Payload, i)))
        })
        .collect::<GenResult<Vec<_>>>()?;
    let rendered: Vec<String> = params.iter().map(Param::render).collect();

    w.line(
        1,
        format!("void {}({})", legalize(&signal.name), rendered.join(", ")),
    );
    w.line(1, "{");
    w.line(2, format!("::DBus::SignalMessage sig(\"{}\");", signal.name));
    if !params.is_empty() {
        w.line(2, "::DBus::MessageIter wi = sig.writer();");
    }
    for param in &params {
        w.line(2, format!("wi << {};", param.name));
    }
    w.line(2, "emit_signal(sig);");
    w.line(1, "}");

    Ok(w.finish())
}

/// A typed local variable of a dispatch stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub ty: String,
    pub name: String,
}

/// One step of a dispatch stub, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Declare an in-variable and decode it from the inbound call.
    Decode(Local),

    /// Declare an out-variable the implementation fills by reference.
    Declare(Local),

    /// Invoke the implementation. `result` receives a direct return value.
    Invoke {
        result: Option<Local>,
        callee: String,
        args: Vec<String>,
    },

    /// Reply with an error and stop if the implementation set the carrier.
    ErrorGuard,

    /// Start the success reply.
    BeginReply,

    /// Encode one out-variable into the success reply.
    Encode(String),

    ReturnReply,
}

/// Outcome of a simulated dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Error,
    Success { payload: Vec<String> },
}

/// The dispatch stub of one method as an ordered plan.
///
/// The same plan is rendered to text and can be replayed with
/// [`DispatchPlan::simulate`] against a given error-carrier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub stub: String,
    pub steps: Vec<Step>,
}

const ERROR_CARRIER: &str = "error";

impl DispatchPlan {
    pub fn build(method: &MethodDef, types: &dyn TypeMapper) -> GenResult<Self> {
        let classified = classify(method);
        let mut steps = Vec::new();
        let mut call_args = Vec::new();

        for (i, arg) in classified.args_in.iter().enumerate() {
            let local = Local {
                ty: types.host_type(&arg.signature)?,
                name: positional(Positional::In, i),
            };
            call_args.push(local.name.clone());
            steps.push(Step::Decode(local));
        }

        let outs = classified
            .args_out
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                Ok(Local {
                    ty: types.host_type(&arg.signature)?,
                    name: positional(Positional::Out, i),
                })
            })
            .collect::<GenResult<Vec<_>>>()?;

        let result = match classified.direct_return() {
            Some(_) => outs.first().cloned(),
            None => {
                for local in &outs {
                    call_args.push(local.name.clone());
                    steps.push(Step::Declare(local.clone()));
                }
                None
            }
        };
        call_args.push(ERROR_CARRIER.to_string());

        steps.push(Step::Invoke {
            result,
            callee: legalize(&method.name),
            args: call_args,
        });
        steps.push(Step::ErrorGuard);
        steps.push(Step::BeginReply);
        steps.extend(outs.into_iter().map(|local| Step::Encode(local.name)));
        steps.push(Step::ReturnReply);

        Ok(Self {
            stub: stub_name(&method.name),
            steps,
        })
    }

    /// Replay the plan and collect every reply it would produce.
    pub fn simulate(&self, error_set: bool) -> Vec<Reply> {
        let mut replies = Vec::new();
        let mut open: Option<Vec<String>> = None;

        for step in &self.steps {
            match step {
                Step::ErrorGuard if error_set => {
                    replies.push(Reply::Error);
                    return replies;
                }
                Step::BeginReply => open = Some(Vec::new()),
                Step::Encode(name) => {
                    if let Some(payload) = open.as_mut() {
                        payload.push(name.clone());
                    }
                }
                Step::ReturnReply => {
                    if let Some(payload) = open.take() {
                        replies.push(Reply::Success { payload });
                    }
                }
                _ => {}
            }
        }

        replies
    }

    pub fn render(&self, ctx: &GenContext<'_>) -> String {
        let mut w = CodeWriter::new(ctx.config);
        let mut writer_open = false;

        w.line(
            1,
            format!(
                "::DBus::Message {}(const ::DBus::CallMessage &call)",
                self.stub
            ),
        );
        w.line(1, "{");
        w.line(2, "::DBus::MessageIter ri = call.reader();");
        w.blank();
        w.line(2, format!("::DBus::Error {ERROR_CARRIER};"));

        for step in &self.steps {
            match step {
                Step::Decode(local) => {
                    w.line(
                        2,
                        format!("{} {}; ri >> {};", local.ty, local.name, local.name),
                    );
                }
                Step::Declare(local) => w.line(2, format!("{} {};", local.ty, local.name)),
                Step::Invoke {
                    result,
                    callee,
                    args,
                } => {
                    let call = format!("{callee}({});", args.join(", "));
                    match result {
                        Some(local) => w.line(2, format!("{} {} = {call}", local.ty, local.name)),
                        None => w.line(2, call),
                    }
                }
                Step::ErrorGuard => {
                    w.line(2, format!("if ({ERROR_CARRIER}.is_set())"));
                    w.line(2, "{");
                    w.line(
                        3,
                        format!(
                            "return ::DBus::ErrorMessage(call, {ERROR_CARRIER}.name(), {ERROR_CARRIER}.message());"
                        ),
                    );
                    w.line(2, "}");
                }
                Step::BeginReply => w.line(2, "::DBus::ReturnMessage reply(call);"),
                Step::Encode(name) => {
                    if !writer_open {
                        w.line(2, "::DBus::MessageIter wi = reply.writer();");
                        writer_open = true;
                    }
                    w.line(2, format!("wi << {name};"));
                }
                Step::ReturnReply => w.line(2, "return reply;"),
            }
        }

        w.line(1, "}");
        w.finish()
    }
}
