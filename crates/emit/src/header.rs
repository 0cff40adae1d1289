//! Class boilerplate: the `Rule` subclass header, `getOpList`, and the
//! documentation comment that embeds the rule's own pretty-printed source.

use rulechef_tokens::Rule;

pub(crate) fn emit_class_header(name: &str) -> String {
    format!(
        "class RuleSimplify{name} : public Rule {{\n\
         public:\n\
         \u{20}\u{20}RuleSimplify{name}(const string &g) : Rule( g, 0, \"simplify{}\") {{}}\t///< Constructor\n\
         \u{20}\u{20}virtual Rule *clone(const ActionGroupList &grouplist) const {{\n\
         \u{20}\u{20}\u{20}\u{20}if (!grouplist.contains(getGroup())) return (Rule *)0;\n\
         \u{20}\u{20}\u{20}\u{20}return new RuleSimplify{name}(getGroup());\n\
         \u{20}\u{20}}}\n\
         \u{20}\u{20}virtual void getOpList(vector<uint4> &oplist) const;\n\
         \u{20}\u{20}virtual int4 applyOp(PcodeOp *op,Funcdata &data);\n\
         }};\n",
        name.to_lowercase(),
    )
}

pub(crate) fn emit_get_oplist(name: &str, match_name: &str) -> String {
    format!(
        "void RuleSimplify{name}::getOpList(vector<uint4> &oplist) const\n\
         {{\n\
         \u{20}\u{20}oplist.push_back(CPUI_{match_name});\n\
         }}\n"
    )
}

pub(crate) fn emit_doc_comment(name: &str, rule: &Rule) -> String {
    let mut out = format!(
        "/// \\class RuleSimplify{name}\n\
         ///\n\
         /// \\brief This rule was automatically generated rule from the expression:\n\
         ///\n"
    );
    for line in rule.pretty_lines() {
        out.push_str(&format!("/// {line}\n"));
    }
    out.push_str("///\n");
    out
}
