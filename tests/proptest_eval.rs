
use proptest::prelude::*;
use rulecraft::{CompareOp, LogicalOp, Predicate, Rule, member, this};
use strategies::{Account, TAGS, arb_account, arb_compare_index, arb_rule, check, relational};

fn compile(rule: &Rule) -> Predicate<Account> {
    Predicate::compile(rule).unwrap()
}

fn direct<T: PartialOrd>(op: usize, actual: &T, literal: &T) -> bool {
    match CompareOp::ALL[op] {
        CompareOp::Eq => actual == literal,
        CompareOp::Neq => actual != literal,
        CompareOp::Gt => actual > literal,
        CompareOp::Gte => actual >= literal,
        CompareOp::Lt => actual < literal,
        CompareOp::Lte => actual <= literal,
    }
}

proptest! {
    /// Every generated rule compiles and evaluates without panicking.
    #[test]
    fn eval_never_panics(rule in arb_rule(3), account in arb_account()) {
        let pred = compile(&rule);
        let _ = pred.evaluate(&account);
    }

    /// A relational leaf agrees with comparing the member directly.
    #[test]
    fn int_relational_matches_direct(
        op in arb_compare_index(),
        literal in -10_i64..=130,
        account in arb_account(),
    ) {
        let pred = compile(&relational("Age", op, literal));
        prop_assert_eq!(pred.evaluate(&account), direct(op, &account.age, &literal));
    }

    #[test]
    fn float_relational_matches_direct(
        op in arb_compare_index(),
        literal in -1000.0_f64..1000.0,
        account in arb_account(),
    ) {
        let pred = compile(&relational("Balance", op, literal));
        prop_assert_eq!(pred.evaluate(&account), direct(op, &account.balance, &literal));
    }

    #[test]
    fn string_relational_matches_direct(
        op in arb_compare_index(),
        literal in "[A-Za-z]{0,6}".prop_filter("null literal", |s| !s.eq_ignore_ascii_case("null")),
        account in arb_account(),
    ) {
        let pred = compile(&relational("Owner", op, &literal));
        let expected = match (&account.owner, CompareOp::ALL[op]) {
            (Some(owner), _) => direct(op, owner, &literal),
            (None, CompareOp::Neq) => true,
            (None, _) => false,
        };
        prop_assert_eq!(pred.evaluate(&account), expected);
    }

    /// Equality against a dotted path reads the default when a link is absent.
    #[test]
    fn dotted_path_equality(
        city in "[A-Z][a-z]{2,5}".prop_filter("null literal", |s| !s.eq_ignore_ascii_case("null")),
        account in arb_account(),
    ) {
        let pred = compile(&member("Address.City").eq(&city));
        let expected = account
            .address
            .as_ref()
            .and_then(|a| a.city.as_deref())
            .is_some_and(|c| c == city);
        prop_assert_eq!(pred.evaluate(&account), expected);
    }

    /// Quantifiers agree with `Iterator::any` and `Iterator::all`.
    #[test]
    fn quantifiers_match_iterators(tag in prop::sample::select(TAGS), account in arb_account()) {
        let any = compile(&member("Tags").any([this().eq(tag)]));
        let all = compile(&member("Tags").all([this().eq(tag)]));
        prop_assert_eq!(any.evaluate(&account), account.tags.iter().any(|t| t == tag));
        prop_assert_eq!(all.evaluate(&account), account.tags.iter().all(|t| t == tag));
    }

    /// `AndAlso` skips its second operand once the first is false.
    #[test]
    fn and_also_short_circuits(first in any::<bool>(), second in any::<bool>(), account in arb_account()) {
        let pred = compile(&check(first).and_also(check(second)));
        prop_assert_eq!(pred.evaluate(&account), first && second);
        prop_assert_eq!(account.checks(), if first { 2 } else { 1 });
    }

    /// `OrElse` skips its second operand once the first is true.
    #[test]
    fn or_else_short_circuits(first in any::<bool>(), second in any::<bool>(), account in arb_account()) {
        let pred = compile(&check(first).or_else(check(second)));
        prop_assert_eq!(pred.evaluate(&account), first || second);
        prop_assert_eq!(account.checks(), if first { 1 } else { 2 });
    }

    /// `And` and `Or` always evaluate every operand.
    #[test]
    fn eager_operators_evaluate_all(
        is_and in any::<bool>(),
        results in prop::collection::vec(any::<bool>(), 1..6),
        account in arb_account(),
    ) {
        let op = if is_and { LogicalOp::And } else { LogicalOp::Or };
        let pred = compile(&Rule::composite(op, results.iter().copied().map(check)));
        let expected = if is_and {
            results.iter().all(|r| *r)
        } else {
            results.iter().any(|r| *r)
        };
        prop_assert_eq!(pred.evaluate(&account), expected);
        prop_assert_eq!(account.checks(), results.len());
    }
}
