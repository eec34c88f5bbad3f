//! Build statement generation for gcc-style toolchains
use buildcommon::prelude::*;

use buildcommon::compdb::{CompileCommand, CompileDb};
use buildcommon::env::Env;
use buildcommon::source::{SourceFile, SourceType};
use ninja_writer::{BuildVariables, Ninja, RuleVariables};

use crate::cmd_build::config::BuildRule;

use super::{BuildInputs, Generate};

pub(super) fn generate(
    env: &Env,
    inputs: &BuildInputs,
    compdb: &mut CompileDb,
) -> ResultIn<String, Generate> {
    let build = inputs.build;
    let cxx = env.cxx.to_utf8()?;
    let cc = env.cc.to_utf8()?;

    let ninja = Ninja::new();
    ninja.comment(&format!("{} ({})", build.name, build.rule.name()));
    ninja.variable("cxx", &cxx);
    ninja.variable("cc", &cc);
    if build.rule == BuildRule::Staticlib {
        ninja.variable("ar", &env.ar.to_utf8()?);
    }
    ninja.variable("defines", &inputs.flags.defines.join(" "));
    ninja.variable("flags", &inputs.flags.flags.join(" "));
    ninja.variable("includes", &inputs.flags.includes.join(" "));
    if build.rule.links() {
        ninja.variable("linkargs", &inputs.flags.linkargs.join(" "));
    }

    let rule_cc = ninja
        .rule("cc", "$cc $defines $flags $includes -MMD -MP -MF $out.d -c $in -o $out")
        .depfile("$out.d")
        .deps_gcc()
        .description("CC $out");
    let rule_cxx = ninja
        .rule("cxx", "$cxx $defines $flags $includes -MMD -MP -MF $out.d -c $in -o $out")
        .depfile("$out.d")
        .deps_gcc()
        .description("CXX $out");

    for (source, object) in inputs.sources.iter().zip(&inputs.objects) {
        match source.typ {
            SourceType::C => rule_cc.build([object.as_str()]).with([source.path.as_str()]),
            SourceType::Cpp => rule_cxx.build([object.as_str()]).with([source.path.as_str()]),
        };
        compdb.push(compile_command(env, inputs, source, object)?);
    }

    let objects: Vec<&str> = inputs.objects.iter().map(String::as_str).collect();

    match build.rule {
        BuildRule::Staticlib => {
            let rule_ar = ninja.rule("ar", "$ar cr $out $in").description("AR $out");
            rule_ar.build([inputs.output.as_str()]).with(objects);
        }
        BuildRule::Exe => {
            let rule_exe = ninja
                .rule("exe", "$cxx $defines $flags $includes $in -o $out $linkargs")
                .description("LINK $out");
            let edge = rule_exe.build([inputs.output.as_str()]).with(objects);
            if !inputs.required.is_empty() {
                edge.with_implicit(inputs.required.iter().map(String::as_str));
            }
        }
        BuildRule::Dynamiclib => {
            let rule_shared = ninja
                .rule(
                    "shared",
                    "$cxx $defines -fPIC -shared -fvisibility=hidden $flags $includes $in -o $out $linkargs",
                )
                .description("SHARED $out");
            let edge = rule_shared.build([inputs.output.as_str()]).with(objects);
            if !inputs.required.is_empty() {
                edge.with_implicit(inputs.required.iter().map(String::as_str));
            }
        }
    }

    Ok(ninja.to_string())
}

fn compile_command(
    env: &Env,
    inputs: &BuildInputs,
    source: &SourceFile,
    object: &str,
) -> ResultIn<CompileCommand, Generate> {
    let compiler = match source.typ {
        SourceType::C => env.cc.to_utf8()?,
        SourceType::Cpp => env.cxx.to_utf8()?,
    };

    let flags = &inputs.flags;
    let mut arguments =
        Vec::with_capacity(flags.defines.len() + flags.flags.len() + flags.includes.len() + 9);
    arguments.push(compiler);
    arguments.extend(flags.defines.iter().cloned());
    arguments.extend(flags.flags.iter().cloned());
    arguments.extend(flags.includes.iter().cloned());
    arguments.extend([
        "-MMD".to_string(),
        "-MP".to_string(),
        "-MF".to_string(),
        format!("{}.d", object),
        "-c".to_string(),
        source.path.clone(),
        "-o".to_string(),
        object.to_string(),
    ]);

    Ok(CompileCommand {
        directory: env.root.to_utf8()?,
        arguments,
        file: source.path.clone(),
        output: object.to_string(),
    })
}
