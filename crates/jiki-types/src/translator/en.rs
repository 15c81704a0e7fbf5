//! English catalog. Every error type has an entry here.

pub(super) const CATALOG: &[(&str, &str)] = &[
    // ── Frame descriptions ──
    ("describe.declaration", "Declared the variable {{name}} with the value {{value}}."),
    ("describe.constant", "Declared the constant {{name}} with the value {{value}}."),
    ("describe.assignment", "Updated the variable {{name}} to {{value}}."),
    ("describe.element_assignment", "Set {{name}}[{{key}}] to {{value}}."),
    ("describe.property_assignment", "Set the property {{property}} to {{value}}."),
    ("describe.update", "Changed {{name}} to {{value}}."),
    ("describe.expression", "Evaluated the expression, which resulted in {{value}}."),
    ("describe.call", "Called {{name}}, which returned {{value}}."),
    ("describe.log", "Logged {{value}}."),
    ("describe.if_true", "The condition evaluated to true, so the code in the block ran."),
    ("describe.if_false", "The condition evaluated to false, so the code in the block was skipped."),
    ("describe.loop_true", "The loop condition evaluated to true, so the loop body ran."),
    ("describe.loop_false", "The loop condition evaluated to false, so the loop finished."),
    ("describe.repeat_iteration", "This is iteration {{iteration}} of {{count}}."),
    ("describe.repeat_empty", "The repeat count was 0, so the loop body never ran."),
    ("describe.repeat_forever", "This is iteration {{iteration}} of the loop."),
    ("describe.for_each_iteration", "Set {{name}} to {{value}} for this iteration."),
    ("describe.for_each_empty", "There was nothing to loop over, so the loop body never ran."),
    ("describe.return", "Returned {{value}} from the function."),
    ("describe.return_empty", "Returned from the function."),
    ("describe.break", "Exited the loop early."),
    ("describe.continue", "Skipped to the next iteration of the loop."),
    ("describe.pass", "Did nothing."),
    ("describe.error", "{{message}}"),
    // ── Syntax errors ──
    ("error.syntax.UnknownCharacter", "We don't recognise the character '{{character}}'."),
    ("error.syntax.PermanentlyExcludedToken", "'{{lexeme}}' is not part of the language you are learning."),
    ("error.syntax.UnimplementedToken", "'{{lexeme}}' is not available yet."),
    ("error.syntax.NodeNotAllowed", "{{friendlyName}} are not allowed in this exercise."),
    ("error.syntax.NestingTooDeep", "This code is nested more than {{max}} levels deep."),
    ("error.syntax.UnknownCharacterInSource", "We don't recognise the character '{{character}}'."),
    ("error.syntax.MissingDoubleQuoteToTerminateStringLiteral", "This text is missing a closing double quote."),
    ("error.syntax.MalformedNumberStartingWithZero", "Numbers can't start with a zero."),
    ("error.syntax.MalformedNumberEndingWithDecimalPoint", "Numbers can't end with a decimal point."),
    ("error.syntax.MalformedNumberWithMultipleDecimalPoints", "Numbers can only have one decimal point."),
    ("error.syntax.MalformedNumberContainingAlphabetCharacters", "Numbers can't contain letters."),
    ("error.syntax.MissingDoToStartFunctionBody", "You need to write 'do' after the function's parameters."),
    ("error.syntax.MissingWithBeforeParametersInFunction", "You need to write 'with' before the function's parameters."),
    ("error.syntax.MissingCommaBetweenFunctionParameters", "Parameters need to be separated by commas."),
    ("error.syntax.UnexpectedTokenAfterParametersInFunction", "We didn't expect '{{lexeme}}' after the parameters."),
    ("error.syntax.MissingFunctionNameInDeclaration", "You need to give the function a name."),
    ("error.syntax.MissingParameterNameInFunctionDeclaration", "We expected a parameter name here."),
    ("error.syntax.DuplicateParameterNameInFunctionDeclaration", "The parameter '{{name}}' is used twice."),
    ("error.syntax.InvalidNestedFunctionDeclaration", "Functions can only be defined at the top level."),
    ("error.syntax.MissingDoToStartIfBody", "You need 'do' after the if condition."),
    ("error.syntax.MissingDoToStartElseBody", "You need 'do' after 'else'."),
    ("error.syntax.MissingDoToStartBlock", "You need 'do' to start this block."),
    ("error.syntax.MissingDoAfterRepeatStatementCondition", "You need 'do' to start the repeat block."),
    ("error.syntax.MissingTimesInRepeatStatement", "You need 'times' after the repeat count."),
    ("error.syntax.MissingEndAfterBlockStatement", "This block needs an 'end'."),
    ("error.syntax.MissingToAfterVariableNameToInitializeValue", "You need 'to' after the variable name."),
    ("error.syntax.MissingToAfterVariableNameToChangeValue", "You need 'to' after the variable you are changing."),
    ("error.syntax.MissingVariableNameInDeclaration", "We expected a variable name here."),
    ("error.syntax.MissingEachAfterForKeyword", "You need 'each' after 'for'."),
    ("error.syntax.MissingElementNameAfterForeachKeyword", "You need a name for each element after 'for each'."),
    ("error.syntax.MissingSecondElementNameAfterForeachKeyword", "You need a second name after the comma."),
    ("error.syntax.MissingInAfterElementNameInForeach", "You need 'in' after the element name."),
    ("error.syntax.MissingByAfterIndexedKeyword", "You need 'by' after 'indexed'."),
    ("error.syntax.MissingIndexNameAfterIndexedByKeywords", "You need a name for the index after 'indexed by'."),
    ("error.syntax.MissingIfConditionAfterIfKeyword", "You need a condition after 'if'."),
    ("error.syntax.UnexpectedElseWithoutMatchingIf", "This 'else' has no matching 'if'."),
    ("error.syntax.MissingEndOfLine", "We expected a new line after '{{previous}}'."),
    ("error.syntax.PointlessStatementWithNoEffect", "This line has no effect on its own."),
    ("error.syntax.PotentialMissingParenthesesForFunctionCall", "Did you mean to call '{{name}}'? Add parentheses."),
    ("error.syntax.InvalidFunctionNameExpression", "Only named functions can be called."),
    ("error.syntax.MissingRightBracketAfterListElements", "This list needs a closing ']'."),
    ("error.syntax.MissingRightBracketAfterFieldNameOrIndex", "This index needs a closing ']'."),
    ("error.syntax.MissingCommaBetweenListElements", "List elements need to be separated by commas."),
    ("error.syntax.MissingRightBraceAfterDictionaryElements", "This dictionary needs a closing '}'."),
    ("error.syntax.MissingCommaBetweenDictionaryElements", "Dictionary entries need to be separated by commas."),
    ("error.syntax.MissingColonAfterDictionaryKey", "You need a ':' after the dictionary key."),
    ("error.syntax.MissingStringAsKeyInDictionary", "Dictionary keys need to be strings."),
    ("error.syntax.UnexpectedEqualsForAssignmentUseSetInstead", "Use 'set ... to' instead of '=' to give a variable a value."),
    ("error.syntax.UnexpectedEqualsForEqualityUseIsInstead", "Use 'is' instead of '=' to compare values."),
    ("error.syntax.UnexpectedChainedEqualityExpression", "Comparisons can't be chained together."),
    ("error.syntax.MiscapitalizedKeywordInStatement", "Keywords are written in lowercase. Did you mean '{{suggestion}}'?"),
    ("error.syntax.UnexpectedKeywordInExpression", "The keyword '{{lexeme}}' can't be used here."),
    ("error.syntax.MissingExpressionInStatement", "We expected a value here."),
    ("error.syntax.UnexpectedTokenInStatement", "We didn't expect '{{lexeme}}' here."),
    ("error.syntax.MissingRightParenthesisAfterExpression", "We expected a ')' here."),
    ("error.syntax.MissingRightParenthesisAfterFunctionCall", "The function call needs a closing ')'."),
    ("error.syntax.MissingDoubleQuoteToTerminateString", "This string is missing a closing quote."),
    ("error.syntax.MissingBacktickToTerminateTemplateLiteral", "This template literal is missing a closing backtick."),
    ("error.syntax.MissingRightBraceInTemplateLiteral", "This '${' needs a closing '}'."),
    ("error.syntax.UnterminatedBlockComment", "This comment is missing a closing '*/'."),
    ("error.syntax.MissingRightBraceAfterBlock", "This block needs a closing '}'."),
    ("error.syntax.MissingInitializerInConstDeclaration", "Constants need a value when they are declared."),
    ("error.syntax.MissingInitializerInVariableDeclaration", "Variables need a value when they are declared."),
    ("error.syntax.ConstInForLoopInit", "Use 'let' instead of 'const' to start a for loop."),
    ("error.syntax.NestedFunctionDeclaration", "Functions can only be declared at the top level."),
    ("error.syntax.DuplicateParameterName", "The parameter '{{name}}' is used twice."),
    ("error.syntax.MissingFunctionName", "We expected a function name here."),
    ("error.syntax.MissingParameterName", "We expected a parameter name here."),
    ("error.syntax.MissingLeftParenthesisAfterFunctionName", "You need '(' after the function name."),
    ("error.syntax.MissingRightParenthesisAfterParameters", "You need ')' after the parameters."),
    ("error.syntax.MissingLeftBraceBeforeFunctionBody", "You need '{' before the function body."),
    ("error.syntax.MissingLeftParenthesisAfterIf", "You need '(' before the condition."),
    ("error.syntax.MissingRightParenthesisAfterIfCondition", "You need ')' after the condition."),
    ("error.syntax.MissingLeftParenAfterRepeat", "You need '(' after 'repeat'."),
    ("error.syntax.MissingRightParenAfterRepeatCount", "You need ')' after the repeat count."),
    ("error.syntax.MissingRightBracketInArray", "This array needs a closing ']'."),
    ("error.syntax.MissingRightBracketInMemberAccess", "This index needs a closing ']'."),
    ("error.syntax.MissingRightBraceInDictionary", "This object needs a closing '}'."),
    ("error.syntax.MissingColonInDictionary", "You need ':' after the key."),
    ("error.syntax.InvalidDictionaryKey", "Object keys must be names or strings."),
    ("error.syntax.DuplicateDictionaryKey", "The key '{{key}}' appears more than once."),
    ("error.syntax.TrailingCommaInArray", "Remove the trailing comma from this array."),
    ("error.syntax.TrailingCommaInDictionary", "Remove the trailing comma from this object."),
    ("error.syntax.InvalidAssignmentTargetExpression", "You can only assign to a variable or a property."),
    ("error.syntax.MissingSemicolon", "You need a ';' at the end of this statement."),
    ("error.syntax.MissingExpression", "We expected a value here."),
    ("error.syntax.MissingVariableName", "We expected a variable name here."),
    ("error.syntax.MissingPropertyName", "We expected a property name after '.'."),
    ("error.syntax.UnexpectedRightBrace", "There is a '}' without a matching '{'."),
    ("error.syntax.MissingClassName", "We expected a class name here."),
    ("error.syntax.MissingLeftBraceAfterClassName", "You need '{' after the class name."),
    ("error.syntax.MissingRightBraceAfterClassBody", "This class needs a closing '}'."),
    ("error.syntax.MissingMethodName", "We expected a method name here."),
    ("error.syntax.MissingOfOrInInForLoop", "You need 'of' or 'in' after the loop variable."),
    ("error.syntax.IndentationError", "Indentation must be a multiple of four spaces."),
    ("error.syntax.UnterminatedString", "This string is missing a closing quote."),
    ("error.syntax.MissingRightBraceInFString", "This '{' in the f-string needs a closing '}'."),
    ("error.syntax.MissingColon", "You need a ':' here."),
    ("error.syntax.MissingIndent", "The block after ':' needs to be indented."),
    ("error.syntax.MissingDedent", "This block was not closed properly."),
    ("error.syntax.MissingIdentifier", "We expected a name here."),
    ("error.syntax.MissingIn", "You need 'in' after the loop variable."),
    ("error.syntax.MissingColonAfterFunctionSignature", "You need ':' after the function signature."),
    ("error.syntax.MissingRightParen", "We expected a ')' here."),
    ("error.syntax.MissingRightBracket", "We expected a ']' here."),
    ("error.syntax.MissingRightBrace", "We expected a '}' here."),
    ("error.syntax.MissingAttributeName", "We expected an attribute name after '.'."),
    ("error.syntax.InvalidAssignmentTarget", "You can only assign to a name or an item."),
    ("error.syntax.MissingNewline", "We expected a new line here."),
    // ── Runtime errors ──
    ("error.runtime.TypeCoercionNotAllowed", "'{{operator}}' can't be used with a {{left}} and a {{right}}."),
    ("error.runtime.TruthinessDisabled", "Expected a boolean here, but got a {{type}}."),
    ("error.runtime.StrictEqualityRequired", "Use '{{suggestion}}' instead of '{{operator}}'."),
    ("error.runtime.ShadowingDisabled", "'{{name}}' already exists in an outer scope."),
    ("error.runtime.VariableAlreadyDeclared", "'{{name}}' has already been declared."),
    ("error.runtime.VariableNotDeclared", "'{{name}}' has not been declared."),
    ("error.runtime.InWithArrayNotAllowed", "'in' can't be used with arrays."),
    ("error.runtime.InOperatorRequiresObject", "'in' needs an object on its right, not a {{type}}."),
    ("error.runtime.InOperatorRequiresStringKey", "'in' needs a string key, not a {{type}}."),
    ("error.runtime.MaxIterationsReached", "The program ran more than {{max}} loop iterations."),
    ("error.runtime.MaxCallDepthExceeded", "Functions were nested more than {{max}} calls deep."),
    ("error.runtime.MethodNotYetAvailable", "'{{method}}' isn't available in this exercise."),
    ("error.runtime.MethodNotYetImplemented", "'{{method}}' hasn't been implemented yet."),
    ("error.runtime.PropertyNotFound", "A {{type}} has no property '{{property}}'."),
    ("error.runtime.InvalidNumberOfArguments", "'{{function}}' expects {{expected}} arguments but got {{got}}."),
    ("error.runtime.TypeError", "Type error: {{details}}."),
    ("error.runtime.IndexOutOfRange", "Index {{index}} is out of range."),
    ("error.runtime.RangeError", "Range error: {{details}}."),
    ("error.runtime.AssignmentToConstant", "'{{name}}' is a constant and can't be changed."),
    ("error.runtime.ComparisonRequiresNumber", "'{{operator}}' can only compare numbers, not a {{left}} and a {{right}}."),
    ("error.runtime.ReturnOutsideFunction", "'return' can only be used inside a function."),
    ("error.runtime.BreakOutsideLoop", "'break' can only be used inside a loop."),
    ("error.runtime.ContinueOutsideLoop", "'continue' can only be used inside a loop."),
    ("error.runtime.FunctionNotFound", "There is no function called '{{name}}'."),
    ("error.runtime.ForOfLoopTargetNotIterable", "A {{type}} can't be looped over."),
    ("error.runtime.UnsupportedOperation", "'{{operator}}' can't be used with a {{type}}."),
    ("error.runtime.LogicErrorInExecution", "{{message}}"),
    ("error.runtime.UndefinedVariable", "'{{name}}' is not defined."),
    ("error.runtime.AttributeError", "A {{type}} has no attribute '{{attribute}}'."),
    ("error.runtime.IndexError", "Index {{index}} is out of range."),
    ("error.runtime.KeyError", "The key {{key}} does not exist."),
    ("error.runtime.ValueError", "Value error: {{details}}."),
    ("error.runtime.ZeroDivisionError", "You can't divide by zero."),
    ("error.runtime.VariableAlreadyDeclaredInScope", "'{{name}}' already exists. Use 'change' to update it."),
    ("error.runtime.DuplicateFunctionDeclarationInScope", "The function '{{name}}' is already defined."),
    ("error.runtime.FunctionNotFoundInScope", "There is no function called '{{name}}'."),
    ("error.runtime.NonCallableTargetInvocationAttempt", "'{{name}}' is not a function."),
    ("error.runtime.UnexpectedUncalledFunctionInExpression", "'{{name}}' is a function. Add parentheses to call it."),
    ("error.runtime.TypeErrorOperandMustBeNumericValue", "Expected a number here, but got a {{type}}."),
    ("error.runtime.TypeErrorOperandMustBeBooleanValue", "Expected a boolean here, but got a {{type}}."),
    ("error.runtime.TypeErrorOperandMustBeStringValue", "Expected a string here, but got a {{type}}."),
    ("error.runtime.TypeErrorOperandsMustBeTwoNumbersOrTwoStrings", "'+' needs two numbers or two strings, not a {{left}} and a {{right}}."),
    ("error.runtime.TypeErrorCannotCompareListObjects", "Lists can't be compared with each other."),
    ("error.runtime.RangeErrorArrayIndexIsZeroBased", "Lists start at index 1, so index 0 doesn't exist."),
    ("error.runtime.IndexOutOfRangeForArrayAccess", "Index {{index}} is out of range for a list of length {{length}}."),
    ("error.runtime.IndexOutOfRangeForArrayModification", "Index {{index}} is out of range for a list of length {{length}}."),
    ("error.runtime.MissingDictionaryKeyInAccess", "The dictionary has no key {{key}}."),
    ("error.runtime.InvalidIndexGetterTargetNotIndexable", "A {{type}} can't be indexed."),
    ("error.runtime.InvalidChangeTargetNotModifiable", "A {{type}} can't be changed by index."),
    ("error.runtime.ForeachLoopTargetNotIterable", "A {{type}} can't be looped over."),
    ("error.runtime.RangeErrorTooFewArgumentsForFunctionCall", "'{{name}}' expects {{expected}} arguments but got {{got}}."),
    ("error.runtime.RangeErrorTooManyArgumentsForFunctionCall", "'{{name}}' expects {{expected}} arguments but got {{got}}."),
    ("error.runtime.RangeErrorRepeatCountMustBeNumericValue", "The repeat count must be a number, not a {{type}}."),
    ("error.runtime.RangeErrorRepeatCountMustBeNonNegative", "The repeat count can't be negative."),
    ("error.runtime.RangeErrorRepeatCountTooHighForExecution", "The repeat count {{count}} is above the limit of {{max}}."),
    ("error.runtime.StateErrorMaxIterationsReachedInLoop", "The program ran more than {{max}} loop iterations."),
    ("error.runtime.StateErrorInfiniteRecursionDetectedInFunction", "'{{name}}' kept calling itself and never finished."),
    ("error.runtime.StateErrorCannotStoreNullValueFromFunction", "'{{name}}' didn't return a value, so there is nothing to store."),
    ("error.runtime.UnexpectedReturnStatementOutsideOfFunction", "'return' can only be used inside a function."),
    ("error.runtime.UnexpectedBreakStatementOutsideOfLoop", "'break' can only be used inside a loop."),
    ("error.runtime.UnexpectedContinueStatementOutsideOfLoop", "'continue' can only be used inside a loop."),
];
