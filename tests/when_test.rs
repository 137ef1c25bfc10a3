#[cfg(test)]
mod tests {
    use deferred::{
        args, when, Arguments, Callback, Deferrable, Deferred, Error, Input, Promise, Value,
    };
    use std::sync::{Arc, Mutex};

    /// A hand-driven input: it only records the callbacks `when` registers.
    #[derive(Clone, Default)]
    struct Manual {
        registered: Arc<Mutex<Vec<(Callback<Arguments>, Callback<Arguments>)>>>,
    }

    impl Manual {
        fn registrations(&self) -> usize {
            self.registered.lock().unwrap().len()
        }

        fn resolve(&self, args: Arguments) {
            let (ok, _) = self.registered.lock().unwrap().remove(0);
            ok(&args);
        }

        fn reject(&self, args: Arguments) {
            let (_, err) = self.registered.lock().unwrap().remove(0);
            err(&args);
        }
    }

    impl Deferrable<Arguments> for Manual {
        fn then_boxed(&self, on_success: Callback<Arguments>, on_failure: Callback<Arguments>) {
            self.registered.lock().unwrap().push((on_success, on_failure));
        }
        fn done_boxed(&self, _: Callback<Arguments>) {}
        fn fail_boxed(&self, _: Callback<Arguments>) {}
        fn is_resolved(&self) -> bool {
            false
        }
        fn is_rejected(&self) -> bool {
            false
        }
        fn is_cancelled(&self) -> bool {
            false
        }
        fn as_promise(&self) -> Promise<Arguments> {
            Deferred::new().as_promise()
        }
        fn try_resolve(&self, _: Arguments) -> Result<(), Error> {
            Ok(())
        }
        fn try_reject(&self, _: Arguments) -> Result<(), Error> {
            Ok(())
        }
        fn try_cancel(&self) -> Result<(), Error> {
            Ok(())
        }
    }

    fn manual(m: &Manual) -> Input {
        Input::Deferred(Box::new(m.clone()))
    }

    fn state(p: &Promise) -> (bool, bool, bool) {
        (p.is_resolved(), p.is_rejected(), p.is_cancelled())
    }

    fn outcome(p: &Promise) -> Arc<Mutex<Vec<Arguments>>> {
        let seen: Arc<Mutex<Vec<Arguments>>> = Arc::default();
        let (ok, err) = (seen.clone(), seen.clone());
        p.then(
            move |a| ok.lock().unwrap().push(a.clone()),
            move |a| err.lock().unwrap().push(a.clone()),
        );
        seen
    }

    fn records(slots: Vec<Arguments>) -> Arguments {
        Arguments::from_positional(slots.into_iter().map(Value::Args))
    }

    #[test]
    fn test_when_accepts_any_number_of_inputs() {
        for n in 0..5 {
            let p = when((0..n).map(Input::value));
            assert_eq!(state(&p), (true, false, false));
        }
    }

    #[test]
    fn test_when_resolves_plain_values_immediately() {
        let p = when([Input::value(1), Input::value("two")]);
        assert_eq!(state(&p), (true, false, false));
        assert_eq!(
            *outcome(&p).lock().unwrap(),
            vec![records(vec![args![1], args!["two"]])]
        );
    }

    #[test]
    fn test_when_without_inputs_resolves_with_empty_payload() {
        let p = when([]);
        assert_eq!(*outcome(&p).lock().unwrap(), vec![Arguments::new()]);
    }

    #[test]
    fn test_when_registers_then_callbacks_once() {
        let d = Manual::default();
        when([manual(&d)]);
        assert_eq!(d.registrations(), 1);
    }

    #[test]
    fn test_when_waits_for_all_inputs_to_be_resolved() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        assert_eq!(state(&p), (false, false, false));
        d1.resolve(args![1]);
        assert_eq!(state(&p), (false, false, false));
        d2.resolve(args![2]);
        assert_eq!(state(&p), (true, false, false));
    }

    #[test]
    fn test_when_rejects_on_second_input_failure() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        d1.resolve(args![1]);
        assert_eq!(state(&p), (false, false, false));
        d2.reject(args![2]);
        assert_eq!(state(&p), (false, true, false));
    }

    #[test]
    fn test_when_ignores_resolution_after_rejection() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        d1.reject(args![1]);
        assert_eq!(state(&p), (false, true, false));
        d2.resolve(args![2]);
        assert_eq!(state(&p), (false, true, false));
    }

    #[test]
    fn test_calls_done_callbacks_with_all_responses_ordered() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        d1.resolve(args![1; foo = 1]);
        assert_eq!(state(&p), (false, false, false));
        d2.resolve(args![2]);
        assert_eq!(state(&p), (true, false, false));
        assert_eq!(
            *outcome(&p).lock().unwrap(),
            vec![records(vec![args![1; foo = 1], args![2]])]
        );
    }

    #[test]
    fn test_out_of_order_completion_keeps_input_order() {
        let (d1, d2) = (Deferred::new(), Deferred::new());
        let p = when([Input::from(d1.clone()), Input::from(d2.clone())]);
        d2.resolve(args!["second"]);
        d1.resolve(args!["first"]);
        assert_eq!(
            *outcome(&p).lock().unwrap(),
            vec![records(vec![args!["first"], args!["second"]])]
        );
    }

    #[test]
    fn test_fail_callbacks_fire_once_with_first_failure_then_resolve() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        d1.reject(args![1; foo = 2]);
        assert_eq!(state(&p), (false, true, false));
        d2.resolve(args![2]);
        assert_eq!(state(&p), (false, true, false));
        assert_eq!(*outcome(&p).lock().unwrap(), vec![args![1; foo = 2]]);
    }

    #[test]
    fn test_fail_callbacks_fire_once_with_first_failure_then_reject() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        d1.reject(args![1; foo = 2]);
        d2.reject(args![2]);
        assert_eq!(state(&p), (false, true, false));
        assert_eq!(*outcome(&p).lock().unwrap(), vec![args![1; foo = 2]]);
    }

    #[test]
    fn test_fail_callbacks_fire_with_failing_input_arguments() {
        let (d1, d2) = (Manual::default(), Manual::default());
        let p = when([manual(&d1), manual(&d2)]);
        d1.resolve(args![1; foo = 2]);
        assert_eq!(state(&p), (false, false, false));
        d2.reject(args![2; foo = 3]);
        assert_eq!(state(&p), (false, true, false));
        assert_eq!(*outcome(&p).lock().unwrap(), vec![args![2; foo = 3]]);
    }

    #[test]
    fn test_mixed_inputs_with_settled_deferreds_and_promises() {
        let ready = Deferred::resolved_with(args![1]);
        let pending: Deferred = Deferred::new();
        let p = when([
            Input::from(ready.as_promise()),
            Input::value(Value::Null),
            Input::from(pending.as_promise()),
        ]);
        assert_eq!(state(&p), (false, false, false));
        pending.resolve(args![; done = true]);
        assert_eq!(
            *outcome(&p).lock().unwrap(),
            vec![records(vec![args![1], args![()], args![; done = true]])]
        );
    }

    #[test]
    fn test_siblings_are_not_cancelled_after_failure() {
        let (d1, d2) = (Deferred::new(), Deferred::new());
        let p = when([Input::from(d1.clone()), Input::from(d2.clone())]);
        d2.reject(args!["boom"]);
        assert_eq!(state(&p), (false, true, false));
        assert!(!d1.is_cancelled());
        d1.resolve(args![1]);
        assert!(d1.is_resolved());
        assert_eq!(state(&p), (false, true, false));
    }

    #[test]
    fn test_result_is_read_only() {
        let p = when([Input::value(1)]);
        assert!(p.try_reject(args![]).is_err());
        assert_eq!(state(&p), (true, false, false));
    }
}
